//! # Modulus Table — Grouped Hexadecimal Output
//!
//! Streams found primes to a writer as comma-terminated lowercase `0x` hex
//! tokens, grouped N per line in the shape of a source-code array
//! initializer. Each token is flushed as it is written so results are
//! visible the moment they are found, not at the end of the run.

use std::io::Write;

use anyhow::Result;
use rug::Integer;

/// Default group width: four moduli per output line.
pub const DEFAULT_PER_LINE: usize = 4;

pub struct ModulusTable<W: Write> {
    out: W,
    per_line: usize,
    column: usize,
    written: u64,
}

impl<W: Write> ModulusTable<W> {
    pub fn new(out: W, per_line: usize) -> Self {
        ModulusTable {
            out,
            per_line: per_line.max(1),
            column: 0,
            written: 0,
        }
    }

    /// Write one modulus as `0x...,`. Tokens within a line are separated by
    /// a single space; the line breaks after per_line tokens.
    pub fn push(&mut self, modulus: &Integer) -> Result<()> {
        if self.column > 0 {
            write!(self.out, " ")?;
        }
        write!(self.out, "{:#x},", modulus)?;
        self.column += 1;
        self.written += 1;
        if self.column == self.per_line {
            writeln!(self.out)?;
            self.column = 0;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Terminate a partial final line. No-op when the last line is already
    /// complete or nothing was written; safe to call more than once.
    pub fn finish(&mut self) -> Result<()> {
        if self.column > 0 {
            writeln!(self.out)?;
            self.column = 0;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Total moduli written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_integer;

    fn moduli(values: &[&str]) -> Vec<Integer> {
        values.iter().map(|s| parse_integer(s).unwrap()).collect()
    }

    fn render(values: &[&str], per_line: usize) -> String {
        let mut buf = Vec::new();
        let mut table = ModulusTable::new(&mut buf, per_line);
        for v in moduli(values) {
            table.push(&v).unwrap();
        }
        table.finish().unwrap();
        drop(table);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn full_row_matches_array_initializer_shape() {
        let text = render(
            &["0xffff00001", "0xfff9c0001", "0xfff8e0001", "0xfff840001"],
            4,
        );
        assert_eq!(text, "0xffff00001, 0xfff9c0001, 0xfff8e0001, 0xfff840001,\n");
    }

    #[test]
    fn single_modulus_is_newline_terminated() {
        assert_eq!(render(&["0x100000020001"], 4), "0x100000020001,\n");
    }

    #[test]
    fn partial_second_row_is_closed_by_finish() {
        let text = render(&["0x3", "0x5", "0x7", "0xb", "0xd", "0x11"], 4);
        assert_eq!(text, "0x3, 0x5, 0x7, 0xb,\n0xd, 0x11,\n");
    }

    #[test]
    fn finish_is_idempotent() {
        let mut buf = Vec::new();
        let mut table = ModulusTable::new(&mut buf, 4);
        table.push(&Integer::from(3u32)).unwrap();
        table.finish().unwrap();
        table.finish().unwrap();
        drop(table);
        assert_eq!(String::from_utf8(buf).unwrap(), "0x3,\n");
    }

    #[test]
    fn finish_after_full_row_is_a_noop() {
        let mut buf = Vec::new();
        let mut table = ModulusTable::new(&mut buf, 2);
        table.push(&Integer::from(3u32)).unwrap();
        table.push(&Integer::from(5u32)).unwrap();
        table.finish().unwrap();
        drop(table);
        assert_eq!(String::from_utf8(buf).unwrap(), "0x3, 0x5,\n");
    }

    #[test]
    fn finish_without_pushes_writes_nothing() {
        assert_eq!(render(&[], 4), "");
    }

    #[test]
    fn per_line_one_puts_every_modulus_on_its_own_row() {
        assert_eq!(render(&["0x3", "0x5"], 1), "0x3,\n0x5,\n");
    }

    #[test]
    fn per_line_zero_is_clamped_to_one() {
        assert_eq!(render(&["0x3", "0x5"], 0), "0x3,\n0x5,\n");
    }

    #[test]
    fn hex_rendering_is_lowercase() {
        assert_eq!(render(&["0xABCDEF"], 4), "0xabcdef,\n");
    }

    #[test]
    fn written_counts_pushes_across_rows() {
        let mut buf = Vec::new();
        let mut table = ModulusTable::new(&mut buf, 2);
        for v in moduli(&["0x3", "0x5", "0x7"]) {
            table.push(&v).unwrap();
        }
        assert_eq!(table.written(), 3);
    }
}
