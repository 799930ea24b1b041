use std::io::Write as _;

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// Next trimmed line, or `None` once stdin is closed. Cancel safe.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    pub async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{text} ");
        std::io::stdout().flush()?;
        self.read_line().await
    }
}
