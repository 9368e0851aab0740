//! The line-oriented game protocol.
//!
//! ```text
//! → NStars  x0 y0 x1 y1 …          ← 0
//! → NUfo    (current next next_next) × NUfo
//! → NShips  ship0 ship1 …          ← NShips, then one move per line
//!   … repeated until NUfo < 0 or the input ends
//! ```
//!
//! Tokens may be separated by any whitespace, including newlines.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use st_core::EngineConfig;
use st_engine::{Engine, TurnSnapshot};

// ── Tokens ────────────────────────────────────────────────────────────────────

/// Whitespace-separated integers pulled from a reader one line at a time,
/// so an interactive judge never has to close its end first.
pub struct Tokens<R> {
    reader:  R,
    pending: VecDeque<String>,
    line:    String,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pending: VecDeque::new(), line: String::new() }
    }

    /// The next integer, or `None` at end of input.
    pub fn next_int(&mut self) -> Result<Option<i64>> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.reader.read_line(&mut self.line).context("reading input")? == 0 {
                return Ok(None);
            }
            self.pending.extend(self.line.split_whitespace().map(str::to_owned));
        }
        let Some(tok) = self.pending.pop_front() else { return Ok(None) };
        let value = tok.parse().with_context(|| format!("`{tok}` is not an integer"))?;
        Ok(Some(value))
    }

    /// A count followed by that many integers.  `None` when the input ends
    /// anywhere inside the block.
    fn block(&mut self, count: i64) -> Result<Option<Vec<i64>>> {
        let mut out = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count.max(0) {
            match self.next_int()? {
                Some(v) => out.push(v),
                None => return Ok(None),
            }
        }
        Ok(Some(out))
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Run one full game over `input`/`output`.  Returns the number of turns
/// played.
pub fn play<R: BufRead, W: Write>(config: EngineConfig, input: R, mut output: W) -> Result<u32> {
    let mut tokens = Tokens::new(input);

    let Some(star_count) = tokens.next_int()? else {
        bail!("input ended before the star count");
    };
    let Some(coords) = tokens.block(star_count)? else {
        bail!("input ended inside the star list");
    };
    let coords = coords
        .into_iter()
        .map(|c| i32::try_from(c).with_context(|| format!("coordinate {c} out of range")))
        .collect::<Result<Vec<_>>>()?;

    let mut engine = Engine::from_flat(config, &coords)?;
    writeln!(output, "0")?;
    output.flush()?;

    let mut turns = 0;
    loop {
        let Some(ufo_count) = tokens.next_int()? else { break };
        if ufo_count < 0 {
            break;
        }
        let Some(ufos) = tokens.block(ufo_count)? else { break };
        let Some(ship_count) = tokens.next_int()? else { break };
        let Some(ships) = tokens.block(ship_count)? else { break };

        let moves = engine.make_moves(&TurnSnapshot::from_flat(&ufos, &ships));
        writeln!(output, "{}", moves.len())?;
        for m in &moves {
            writeln!(output, "{}", m.0)?;
        }
        output.flush()?;
        turns += 1;
    }

    tracing::info!(turns, mode = %engine.mode(), unvisited = engine.state().remaining_unvisited, "game over");
    Ok(turns)
}
