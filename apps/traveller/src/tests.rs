//! Protocol tests for the traveller binary.

#[cfg(test)]
mod protocol {
    use std::io::Cursor;

    use st_core::EngineConfig;

    use crate::protocol::{Tokens, play};

    fn config() -> EngineConfig {
        EngineConfig { planning_budget_ms: 20, ..EngineConfig::default() }
    }

    fn run(input: &str) -> anyhow::Result<(u32, String)> {
        let mut out = Vec::new();
        let turns = play(config(), Cursor::new(input), &mut out)?;
        Ok((turns, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn tokens_span_lines() {
        let mut t = Tokens::new(Cursor::new("1  2\n\n 3\t-4\n"));
        let mut got = Vec::new();
        while let Some(v) = t.next_int().unwrap() {
            got.push(v);
        }
        assert_eq!(got, [1, 2, 3, -4]);
    }

    #[test]
    fn tokens_reject_garbage() {
        let mut t = Tokens::new(Cursor::new("12 x"));
        assert_eq!(t.next_int().unwrap(), Some(12));
        assert!(t.next_int().is_err());
    }

    #[test]
    fn two_turns_then_stop() {
        // Without UFOs a hitchhiking ship holds its position.
        let input = "8\n0 0 10 0 10 10 0 10\n0\n1\n0\n0\n1\n1\n-1\n";
        let (turns, out) = run(input).unwrap();
        assert_eq!(turns, 2);
        assert_eq!(out, "0\n1\n0\n1\n1\n");
    }

    #[test]
    fn truncated_stream_ends_cleanly() {
        let (turns, out) = run("4 0 0 5 5\n1 0 1").unwrap();
        assert_eq!(turns, 0);
        assert_eq!(out, "0\n");
    }

    #[test]
    fn moves_are_valid_star_ids() {
        let input = "6 0 0 10 0 20 0\n3 0 1 2\n2 0 2\n";
        let (turns, out) = run(input).unwrap();
        assert_eq!(turns, 1);
        let lines: Vec<u32> = out.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(lines[0], 0);
        assert_eq!(lines[1], 2);
        assert!(lines[2..].iter().all(|&m| m < 3));
    }

    #[test]
    fn empty_field_is_an_error() {
        assert!(run("0\n-1\n").is_err());
    }

    #[test]
    fn missing_star_list_is_an_error() {
        assert!(run("").is_err());
        assert!(run("4 1 2").is_err());
    }
}
