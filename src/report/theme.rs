//! Visual theme and reporter configuration.

use console::Style;

/// Line width the help text is wrapped to.
pub const DEFAULT_LINE_WIDTH: usize = 70;

/// Styles for the console report.
#[derive(Debug, Clone)]
pub struct CheckTheme {
    /// Style for passed checks and the success banner (green).
    pub success: Style,
    /// Style for failed recommendations (yellow).
    pub warning: Style,
    /// Style for failed requirements and the failure banner (red).
    pub error: Style,
    /// Style for section titles (bold).
    pub title: Style,
    /// Style for secondary text such as the closing note (dim).
    pub dim: Style,
}

impl Default for CheckTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            title: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            title: Style::new(),
            dim: Style::new(),
        }
    }
}

/// Explicit rendering configuration, decided once by the caller.
///
/// Color capability is a property of the destination stream, so it is
/// passed in rather than sniffed globally at render time.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    pub color_enabled: bool,
    pub line_width: usize,
}

impl ReporterConfig {
    pub fn new(color_enabled: bool) -> Self {
        Self {
            color_enabled,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub(super) fn theme(&self) -> CheckTheme {
        if self.color_enabled {
            CheckTheme::new()
        } else {
            CheckTheme::plain()
        }
    }
}

/// Check if colors should be enabled for stdout.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
