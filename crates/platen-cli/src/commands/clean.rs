//! Clean command implementation.

use crate::commands::utils::Workspace;
use crate::dev::CleanOutcome;
use crate::error::Result;
use crate::ui;

/// Remove the output directory. An absent directory is not an error.
pub async fn execute(workspace: &Workspace) -> Result<()> {
    ui::banner("clean");

    let builder = workspace.builder();
    match builder.clean().await {
        Ok(outcome) => {
            report(outcome, workspace);
            Ok(())
        }
        Err(e) => {
            ui::error(&format!("Could not remove {}", workspace.display_output()));
            Err(e)
        }
    }
}

pub(crate) fn report(outcome: CleanOutcome, workspace: &Workspace) {
    match outcome {
        CleanOutcome::Removed => ui::success(&format!("Removed {}", workspace.display_output())),
        CleanOutcome::Absent => ui::success(&format!(
            "Nothing to clean ({} does not exist)",
            workspace.display_output()
        )),
    }
}
