use std::io::{BufRead, Write};

use crate::commands::{self, FileDialogs, Flow};
use crate::state::DesktopState;

/// Read commands line by line until `quit` or end of input.
///
/// Command errors are printed and the session carries on; only I/O on the
/// terminal itself ends it with an error.
pub fn run<R: BufRead, W: Write, D: FileDialogs>(
    state: &mut DesktopState,
    input: R,
    out: &mut W,
    dialogs: &D,
) -> eyre::Result<()> {
    writeln!(out, "Breast Cancer Screening - data entry (type `help` for commands)\n")?;
    write!(out, "{}", commands::render_screen(state)?)?;
    prompt(state, out)?;

    for line in input.lines() {
        let line = line?;
        let today = jiff::Zoned::now().date();
        let mut buf = String::new();

        let flow = match commands::parse(&line) {
            Ok(Some(command)) => commands::execute(state, command, dialogs, today, &mut buf),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => Err(e),
        };
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => write!(out, "{buf}")?,
            Err(e) => {
                tracing::debug!(error = %e, input = %line, "command rejected");
                writeln!(out, "error: {e}")?;
            }
        }
        prompt(state, out)?;
    }

    tracing::info!(submitted = state.wizard.is_submitted(), "session ended");
    Ok(())
}

fn prompt<W: Write>(state: &DesktopState, out: &mut W) -> eyre::Result<()> {
    if state.review.is_some() {
        write!(out, "review> ")?;
    } else {
        let (page, pages) = state.wizard.progress();
        write!(out, "[{page}/{pages}]> ")?;
    }
    out.flush()?;
    Ok(())
}
