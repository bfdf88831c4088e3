//! UI context for environment detection and configuration.

use std::io::IsTerminal;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols are enabled
    pub unicode: bool,
    /// Whether stderr can host a spinner
    pub animate: bool,
}

impl UiContext {
    /// Create context from environment and CLI flags.
    pub fn from_env(no_color_flag: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();

        // Resolve color: disabled if NO_COLOR env, --no-color flag, or TERM=dumb
        let color = is_tty && !no_color_flag && !no_color_env && !term_is_dumb;

        Self {
            color,
            unicode: !term_is_dumb,
            animate: std::io::stderr().is_terminal() && !term_is_dumb,
        }
    }

    /// Context with no color, ASCII symbols and no animation.
    pub fn plain() -> Self {
        Self {
            color: false,
            unicode: false,
            animate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_flag_disables_color() {
        let ctx = UiContext::from_env(true);
        assert!(!ctx.color);
    }

    #[test]
    fn test_plain_context() {
        let ctx = UiContext::plain();
        assert!(!ctx.color && !ctx.unicode && !ctx.animate);
    }
}
