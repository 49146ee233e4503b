use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use crate::core::models::structure::{Structure, StructureBuilder};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Shortest ATOM/HETATM line that still carries all three coordinates.
const MIN_ATOM_LINE_LEN: usize = 54;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Header records (HEADER, TITLE, REMARK, ...) preceding the first atom.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_float(line, line_num, start, end)
    }
}

pub struct PdbFile;

impl PdbFile {
    fn parse_atom_line(
        line: &str,
        line_num: usize,
        builder: &mut StructureBuilder,
        is_hetero: bool,
    ) -> Result<(), PdbError> {
        if line.len() < MIN_ATOM_LINE_LEN {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let serial_str = slice_and_trim(line, 6, 11);
        let name = slice_and_trim(line, 12, 16);
        let res_name = slice_and_trim(line, 17, 20);
        let chain_id = column_char(line, 21).unwrap_or('A');
        let res_seq_str = slice_and_trim(line, 22, 26);
        let insertion_code = column_char(line, 26);

        if name.is_empty() {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::MissingRequiredField {
                    columns: "13-16".into(),
                },
            });
        }
        let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "7-11".into(),
                value: serial_str.into(),
            },
        })?;
        let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: res_seq_str.into(),
            },
        })?;
        let x = parse_float(line, line_num, 30, 38)?;
        let y = parse_float(line, line_num, 38, 46)?;
        let z = parse_float(line, line_num, 46, 54)?;
        let occupancy = parse_optional_float(line, line_num, 54, 60, 1.0)?;
        let b_factor = parse_optional_float(line, line_num, 60, 66, 0.0)?;
        let element = slice_and_trim(line, 76, 78);

        if builder.current_chain_id() != Some(chain_id) {
            builder.start_chain(chain_id);
        }
        if builder.current_residue_key() != Some((res_seq, insertion_code)) {
            builder.start_residue(res_seq, insertion_code, res_name, is_hetero);
        }

        let mut atom = Atom::new(serial, name, Point3::new(x, y, z));
        atom.occupancy = occupancy;
        atom.b_factor = b_factor;
        if !element.is_empty() {
            atom.element = element.to_string();
        }
        builder.add_atom(atom);
        Ok(())
    }

    fn format_atom_name(atom: &Atom) -> String {
        if atom.name.len() < 4 && atom.element.len() == 1 {
            format!(" {:<3}", atom.name)
        } else {
            format!("{:<4}", atom.name)
        }
    }

    fn write_atom_line(
        writer: &mut impl Write,
        chain_id: char,
        residue: &Residue,
        atom: &Atom,
    ) -> io::Result<()> {
        let record = if residue.is_hetero { "HETATM" } else { "ATOM" };
        writeln!(
            writer,
            "{:<6}{:>5} {} {:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record,
            atom.serial,
            Self::format_atom_name(atom),
            residue.name,
            chain_id,
            residue.id,
            residue.insertion_code.unwrap_or(' '),
            atom.position.x,
            atom.position.y,
            atom.position.z,
            atom.occupancy,
            atom.b_factor,
            atom.element,
        )
    }
}

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut seen_atoms = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" => {
                    Self::parse_atom_line(&line, line_num, &mut builder, false)?;
                    seen_atoms = true;
                }
                "HETATM" => {
                    Self::parse_atom_line(&line, line_num, &mut builder, true)?;
                    seen_atoms = true;
                }
                "ENDMDL" | "END" => break,
                "" => continue,
                _ if !seen_atoms => metadata.header_lines.push(line),
                _ => {}
            }
        }

        if !seen_atoms {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok((builder.build(), metadata))
    }

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        let mut last_serial = 0;
        for chain in structure.chains() {
            let mut last_residue = None;
            for residue in chain.residues() {
                for atom in residue.atoms() {
                    Self::write_atom_line(writer, chain.id, residue, atom)?;
                    last_serial = last_serial.max(atom.serial);
                }
                last_residue = Some(residue);
            }
            if let Some(residue) = last_residue {
                last_serial += 1;
                writeln!(
                    writer,
                    "TER   {:>5}      {:>3} {}{:>4}{}",
                    last_serial,
                    residue.name,
                    chain.id,
                    residue.id,
                    residue.insertion_code.unwrap_or(' ')
                )?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_structure_to(
        structure: &Structure,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let metadata = PdbMetadata {
            header_lines: vec!["REMARK   1 GENERATED BY GEODOCK".to_string()],
        };
        Self::write_to(structure, &metadata, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_CHAIN_PDB: &str = "\
HEADER    TEST COMPLEX
REMARK   2 RESOLUTION. 2.00 ANGSTROMS.
ATOM      1  N   GLY A   1      11.104   6.134  -6.504  1.00 20.00           N
ATOM      2  CA  GLY A   1      11.639   6.071  -5.147  1.00 20.00           C
ATOM      3  C   GLY A   1      12.750   7.098  -4.984  1.00 20.00           C
ATOM      4  N   ALA A   2      13.000   7.500  -3.800  1.00 20.00           N
ATOM      5  CA AALA A   2      14.000   8.500  -3.500  0.50 20.00           C
ATOM      6  CA BALA A   2      14.500   8.900  -3.400  0.50 20.00           C
ATOM      7  C   ALA A   2      15.000   9.000  -2.000  1.00 20.00           C
TER       8      ALA A   2
ATOM      9  N   LYS B  10      -1.000   0.000   0.000  1.00 10.00           N
ATOM     10  CA  LYS B  10      -2.000   0.000   0.000  1.00 10.00           C
ATOM     11  C   LYS B  10      -3.000   0.000   0.000  1.00 10.00           C
HETATM   12  O   HOH B 101       5.000   5.000   5.000  1.00 30.00           O
END
";

    fn read(content: &str) -> Result<(Structure, PdbMetadata), PdbError> {
        PdbFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn read_parses_chains_residues_and_header() {
        let (structure, metadata) = read(TWO_CHAIN_PDB).unwrap();
        assert_eq!(metadata.header_lines.len(), 2);
        assert_eq!(structure.chains().len(), 2);

        let chain_a = structure.chain('A').unwrap();
        assert_eq!(chain_a.residues().len(), 2);
        assert_eq!(chain_a.residues()[0].name, "GLY");
        let ca = chain_a.residues()[0].atom("CA").unwrap();
        assert_eq!(ca.serial, 2);
        assert!((ca.position.x - 11.639).abs() < 1e-9);

        let chain_b = structure.chain('B').unwrap();
        assert_eq!(chain_b.residues().len(), 2);
        assert!(chain_b.residues()[1].is_hetero);
    }

    #[test]
    fn read_keeps_first_alternate_location() {
        let (structure, _) = read(TWO_CHAIN_PDB).unwrap();
        let ala = &structure.chain('A').unwrap().residues()[1];
        let ca = ala.atom("CA").unwrap();
        assert_eq!(ca.serial, 5);
        assert_eq!(ca.occupancy, 0.5);
        assert_eq!(ala.atoms().len(), 3);
    }

    #[test]
    fn read_stops_after_first_model() {
        let content = "\
MODEL        1
ATOM      1  CA  GLY A   1       1.000   1.000   1.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  GLY A   1       2.000   2.000   2.000  1.00  0.00           C
ATOM      2  CA  ALA A   2       3.000   3.000   3.000  1.00  0.00           C
ENDMDL
";
        let (structure, _) = read(content).unwrap();
        assert_eq!(structure.residue_count(), 1);
        let ca = structure.chains()[0].residues()[0].atom("CA").unwrap();
        assert_eq!(ca.position.x, 1.0);
    }

    #[test]
    fn read_distinguishes_insertion_codes() {
        let content = "\
ATOM      1  CA  SER H  52       1.000   1.000   1.000  1.00  0.00           C
ATOM      2  CA  GLY H  52A      2.000   2.000   2.000  1.00  0.00           C
ATOM      3  CA  TYR H  53       3.000   3.000   3.000  1.00  0.00           C
";
        let (structure, _) = read(content).unwrap();
        let residues = structure.chains()[0].residues();
        assert_eq!(residues.len(), 3);
        assert_eq!(residues[1].insertion_code, Some('A'));
    }

    #[test]
    fn read_fills_optional_columns_with_defaults() {
        let content = "ATOM      1  CA  GLY A   1       1.000   2.000   3.000\n";
        let (structure, _) = read(content).unwrap();
        let ca = structure.chains()[0].residues()[0].atom("CA").unwrap();
        assert_eq!(ca.occupancy, 1.0);
        assert_eq!(ca.b_factor, 0.0);
        assert_eq!(ca.element, "C");
    }

    #[test]
    fn read_rejects_short_atom_line() {
        let content = "ATOM      1  CA  GLY A   1       1.000\n";
        let result = read(content);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort
            })
        ));
    }

    #[test]
    fn read_rejects_malformed_coordinate() {
        let content = "ATOM      1  CA  GLY A   1       1.000   abc     3.000  1.00  0.00           C\n";
        let result = read(content);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::InvalidFloat { .. },
                ..
            })
        ));
    }

    #[test]
    fn read_rejects_file_without_atoms() {
        let result = read("HEADER    EMPTY\nEND\n");
        assert!(matches!(result, Err(PdbError::MissingRecord(_))));
    }

    #[test]
    fn written_structure_can_be_read_back() {
        let (structure, _) = read(TWO_CHAIN_PDB).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_structure_to(&structure, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("REMARK   1 GENERATED BY GEODOCK"));
        assert!(text.contains("TER"));
        assert!(text.trim_end().ends_with("END"));
        assert!(text.contains("ATOM      2  CA  GLY A   1      11.639   6.071  -5.147  1.00 20.00           C"));

        let (reread, _) = read(&text).unwrap();
        assert_eq!(reread.residue_count(), structure.residue_count());
        assert_eq!(reread.atom_count(), structure.atom_count());
    }
}
