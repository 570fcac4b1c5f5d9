use crate::backend::{DialogCommand, Key};

/// Identifier of the overlay view. There is never more than one overlay.
pub const DIALOG_VIEW: &str = "dialog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Editable text input, closed with accept or cancel.
    Prompt,
    /// Yes/no question, closed with affirm or decline.
    Confirm,
    /// Read-only notice, closed with accept or cancel; it never completes.
    Message,
}

impl DialogKind {
    pub fn is_editable(self) -> bool {
        matches!(self, DialogKind::Prompt)
    }

    /// Keys installed on the overlay while it is open.
    pub fn bindings(self) -> &'static [(Key, DialogCommand)] {
        match self {
            DialogKind::Prompt | DialogKind::Message => &[
                (Key::Enter, DialogCommand::Accept),
                (Key::Ctrl('q'), DialogCommand::Cancel),
            ],
            DialogKind::Confirm => &[
                (Key::Ctrl('y'), DialogCommand::Affirm),
                (Key::Ctrl('n'), DialogCommand::Decline),
            ],
        }
    }
}

/// What a closed dialog hands back to whoever opened it.
///
/// `P` is the caller's continuation: whatever it needs to finish the operation that opened the
/// dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<P> {
    Text(P, String),
    Confirmed(P, bool),
}

#[derive(Debug)]
pub(crate) struct Dialog<P> {
    pub(crate) kind: DialogKind,
    pub(crate) pending: Option<P>,
}

impl<P> Dialog<P> {
    /// Turns the closing key into a completion. Cancel, and keys that do not belong to this
    /// kind of dialog, complete with nothing.
    pub(crate) fn complete(self, command: DialogCommand, text: String) -> Option<Completion<P>> {
        let pending = self.pending?;
        match (self.kind, command) {
            (DialogKind::Prompt, DialogCommand::Accept) => Some(Completion::Text(pending, text)),
            (DialogKind::Confirm, DialogCommand::Affirm) => {
                Some(Completion::Confirmed(pending, true))
            }
            (DialogKind::Confirm, DialogCommand::Decline) => {
                Some(Completion::Confirmed(pending, false))
            }
            _ => None,
        }
    }
}
