//! Interactive confirmation on the terminal.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::phase::{ConfirmContext, ConfirmGate};

/// A [`ConfirmGate`] that asks on a prompt stream and reads a yes/no answer.
///
/// Anything other than `y` or `yes` (case-insensitive), including end of
/// input and read errors, declines.
pub struct TerminalGate<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> std::fmt::Debug for TerminalGate<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalGate").finish_non_exhaustive()
    }
}

impl TerminalGate<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Prompts on stderr and reads from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> TerminalGate<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }
}

#[async_trait]
impl<R, W> ConfirmGate for TerminalGate<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn confirm(&self, context: &ConfirmContext) -> bool {
        let mut guard = self.io.lock().await;
        let (input, output) = &mut *guard;

        let prompt = format!(
            "{}\n{}\n[y] {} / [N] {}: ",
            context.title, context.message, context.confirm_text, context.cancel_text
        );
        if output.write_all(prompt.as_bytes()).await.is_err() || output.flush().await.is_err() {
            return false;
        }

        let mut answer = String::new();
        match input.read_line(&mut answer).await {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
