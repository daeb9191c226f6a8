use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use asl_shared::LandmarkFrame;

pub struct FrameSource {
    lines: io::Lines<Box<dyn BufRead>>,
    line_no: usize,
}

impl FrameSource {
    /// Opens a recording, `-` meaning stdin.
    pub fn open(input: &str) -> Result<Self> {
        let reader: Box<dyn BufRead> = if input == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = File::open(input)
                .with_context(|| format!("Failed to open landmark recording {}", input))?;
            Box::new(BufReader::new(file))
        };
        Ok(Self::from_reader(reader))
    }

    pub fn from_reader(reader: Box<dyn BufRead>) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl Iterator for FrameSource {
    type Item = Result<LandmarkFrame>;

    /// Blank lines are skipped; a line that is not a frame is an error for
    /// that line only.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(
                        anyhow::Error::new(e).context("Failed to read landmark recording"),
                    ))
                }
            };
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Some(
                LandmarkFrame::from_json(line)
                    .with_context(|| format!("Invalid frame on line {}", self.line_no)),
            );
        }
    }
}
