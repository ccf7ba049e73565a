//! Status lines on stderr.
//!
//! stdout carries rendered HTML or JSON, so everything meant for the person
//! at the terminal goes through [`Output`].

use codetabs::CodeTabs;
use console::{Style, Term};

/// Severity of a status line, which picks its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Status {
    Note,
    Done,
    Warn,
    Fail,
}

impl Status {
    fn style(self) -> Style {
        match self {
            Self::Note => Style::new(),
            Self::Done => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Fail => Style::new().red().bold(),
        }
    }
}

pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub(crate) fn line(&self, status: Status, msg: &str) {
        let _ = self.term.write_line(&status.style().apply_to(msg).to_string());
    }

    /// One dimmed summary line per widget; widgets without tabs are warned
    /// about instead.
    pub(crate) fn widget(&self, widget: &CodeTabs) {
        let tabs = widget.tabs().len();
        let line = format_widget(widget.id().root().as_str(), widget.group(), tabs);
        if tabs == 0 {
            self.line(Status::Warn, &line);
        } else {
            let _ = self.term.write_line(&Style::new().dim().apply_to(line).to_string());
        }
    }
}

/// `  <id> [<group>] <n> tab(s)`, or `no valid tabs` when empty.
pub(crate) fn format_widget(id: &str, group: &str, tabs: usize) -> String {
    if tabs == 0 {
        format!("  {id} [{group}] no valid tabs")
    } else {
        format!("  {id} [{group}] {tabs} tab(s)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_widget() {
        assert_eq!(format_widget("install", "pkg", 3), "  install [pkg] 3 tab(s)");
        assert_eq!(
            format_widget("code-tabs-2", "default", 0),
            "  code-tabs-2 [default] no valid tabs"
        );
    }
}
