//! Status bar: bottom line with input mode, catalog state and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Workspace;
use crate::theme::{C_ACCENT, C_ERROR, C_MODE_FILTER, C_MODE_NORMAL, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTRE",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
        }
    }
}

/// Key hints for the current context.
pub fn key_hints(mode: InputMode, workspace: Workspace, details_open: bool) -> &'static str {
    if mode == InputMode::Filter {
        return " tapez pour filtrer  ↑↓ déplacer  Enter garder  Esc effacer/fermer";
    }
    if details_open {
        return " ↑↓/jk défiler  y copier l'itinéraire  a disponibilité  Esc fermer  ? aide";
    }
    match workspace {
        Workspace::Home => " 1-4/Tab onglets  Enter ouvrir  K touches  ? aide  q quitter",
        Workspace::Medicines => {
            " ↑↓/jk sélection  Enter détails  n/→ suivant  b/← précédent  r recharger  +/- taille  / filtrer  a disponibilité  ? aide  q quitter"
        }
        Workspace::Pharmacies | Workspace::OnDuty => {
            " ↑↓/jk sélection  Enter détails  y itinéraire  / filtrer  Esc tout afficher  ? aide  q quitter"
        }
    }
}

/// Draw the keybindings footer bar (one row). `loading` lights the mode
/// label; `error` turns it red.
pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    workspace: Workspace,
    details_open: bool,
    loading: bool,
    error: bool,
) {
    let label_color = if error {
        C_ERROR
    } else if loading && mode == InputMode::Normal {
        C_ACCENT
    } else {
        mode.color()
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            key_hints(mode, workspace, details_open),
            Style::default().fg(C_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_mode_hints_win_over_workspace() {
        let hints = key_hints(InputMode::Filter, Workspace::Medicines, true);
        assert!(hints.contains("filtrer"));
        assert!(!hints.contains("suivant"));
    }

    #[test]
    fn medicine_hints_mention_paging() {
        let hints = key_hints(InputMode::Normal, Workspace::Medicines, false);
        assert!(hints.contains("suivant"));
        assert!(hints.contains("précédent"));
    }
}
