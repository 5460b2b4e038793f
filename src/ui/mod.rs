use anyhow::Result;
use inquire::InquireError;

use crate::status;

mod progress;
mod style;

pub use progress::Progress;
pub use style::Style;

/// Runs an interactive session; Ctrl+C or Escape ends it without error.
///
/// Returns `Ok(false)` when the user cancelled, so nothing was saved.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<bool>
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Ok(()) => Ok(true),
        Err(e) => match e.downcast_ref::<InquireError>() {
            Some(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                println!();
                status!("{}", Style::secondary("Cancelled, configuration unchanged."));
                Ok(false)
            }
            _ => Err(e),
        },
    }
}
