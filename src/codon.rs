//! Codon translation with the standard genetic code and IUPAC ambiguity codes.

use std::fmt;

/// One translated codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    /// A residue by its one-letter code.
    Residue(u8),
    Stop,
    /// The codon could not be resolved to a single residue.
    Unknown,
}

impl AminoAcid {
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Residue(b) => b,
            Self::Stop => b'*',
            Self::Unknown => b'X',
        }
    }

    #[must_use]
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }

    #[must_use]
    pub fn three_letter(self) -> &'static str {
        match self {
            Self::Stop => "Stop",
            Self::Unknown => "???",
            Self::Residue(b) => match b {
                b'A' => "Ala",
                b'R' => "Arg",
                b'N' => "Asn",
                b'D' => "Asp",
                b'C' => "Cys",
                b'Q' => "Gln",
                b'E' => "Glu",
                b'G' => "Gly",
                b'H' => "His",
                b'I' => "Ile",
                b'L' => "Leu",
                b'K' => "Lys",
                b'M' => "Met",
                b'F' => "Phe",
                b'P' => "Pro",
                b'S' => "Ser",
                b'T' => "Thr",
                b'W' => "Trp",
                b'Y' => "Tyr",
                b'V' => "Val",
                _ => "???",
            },
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_byte() as char)
    }
}

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding: A=0, C=1, G=2, T/U=3.
/// Index = first*16 + second*4 + third.
pub struct CodonTable {
    table: [u8; 64],
}

/// Concrete base indices a nucleotide or IUPAC code stands for.
fn expand_base(b: u8) -> &'static [usize] {
    match b.to_ascii_uppercase() {
        b'A' => &[0],
        b'C' => &[1],
        b'G' => &[2],
        b'T' | b'U' => &[3],
        b'R' => &[0, 2],
        b'Y' => &[1, 3],
        b'S' => &[1, 2],
        b'W' => &[0, 3],
        b'K' => &[2, 3],
        b'M' => &[0, 1],
        b'B' => &[1, 2, 3],
        b'D' => &[0, 2, 3],
        b'H' => &[0, 1, 3],
        b'V' => &[0, 1, 2],
        b'N' => &[0, 1, 2, 3],
        _ => &[],
    }
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        #[rustfmt::skip]
        let table: [u8; 64] = [
            b'K', b'N', b'K', b'N',  // AA*
            b'T', b'T', b'T', b'T',  // AC*
            b'R', b'S', b'R', b'S',  // AG*
            b'I', b'I', b'M', b'I',  // AT*
            b'Q', b'H', b'Q', b'H',  // CA*
            b'P', b'P', b'P', b'P',  // CC*
            b'R', b'R', b'R', b'R',  // CG*
            b'L', b'L', b'L', b'L',  // CT*
            b'E', b'D', b'E', b'D',  // GA*
            b'A', b'A', b'A', b'A',  // GC*
            b'G', b'G', b'G', b'G',  // GG*
            b'V', b'V', b'V', b'V',  // GT*
            b'*', b'Y', b'*', b'Y',  // TA*
            b'S', b'S', b'S', b'S',  // TC*
            b'*', b'C', b'W', b'C',  // TG*
            b'L', b'F', b'L', b'F',  // TT*
        ];
        Self { table }
    }

    /// Translate a single codon.
    ///
    /// Ambiguous codons resolve to a residue only when every concrete
    /// expansion agrees.
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> AminoAcid {
        let [b0, b1, b2] = match codon {
            [a, b, c] => [*a, *b, *c],
            _ => return AminoAcid::Unknown,
        };
        let mut resolved: Option<u8> = None;
        for &i0 in expand_base(b0) {
            for &i1 in expand_base(b1) {
                for &i2 in expand_base(b2) {
                    let aa = self.table[i0 * 16 + i1 * 4 + i2];
                    match resolved {
                        None => resolved = Some(aa),
                        Some(prev) if prev != aa => return AminoAcid::Unknown,
                        Some(_) => {}
                    }
                }
            }
        }
        match resolved {
            Some(b'*') => AminoAcid::Stop,
            Some(aa) => AminoAcid::Residue(aa),
            None => AminoAcid::Unknown,
        }
    }
}

/// Translate a CDS nucleotide sequence. A trailing partial codon is dropped.
pub fn translate(cds: &[u8], table: &CodonTable) -> Vec<AminoAcid> {
    cds.chunks_exact(3)
        .map(|codon| table.translate_codon(codon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aa(b: u8) -> AminoAcid {
        AminoAcid::Residue(b)
    }

    #[test]
    fn standard_start_codon() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATG"), aa(b'M'));
        assert_eq!(table.translate_codon(b"atg"), aa(b'M'));
        assert_eq!(table.translate_codon(b"AUG"), aa(b'M'));
    }

    #[test]
    fn standard_stop_codons() {
        let table = CodonTable::standard();
        for codon in [b"TAA", b"TAG", b"TGA"] {
            assert_eq!(table.translate_codon(codon), AminoAcid::Stop);
        }
    }

    #[test]
    fn ambiguous_codons_that_agree() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"TAR"), AminoAcid::Stop);
        assert_eq!(table.translate_codon(b"TRA"), AminoAcid::Stop);
        assert_eq!(table.translate_codon(b"GCN"), aa(b'A'));
        assert_eq!(table.translate_codon(b"MGR"), aa(b'R'));
        assert_eq!(table.translate_codon(b"YTR"), aa(b'L'));
        assert_eq!(table.translate_codon(b"ATH"), aa(b'I'));
    }

    #[test]
    fn ambiguous_codons_that_disagree() {
        let table = CodonTable::standard();
        // TAY = Tyr, TAR = Stop
        assert_eq!(table.translate_codon(b"TAN"), AminoAcid::Unknown);
        assert_eq!(table.translate_codon(b"NNN"), AminoAcid::Unknown);
    }

    #[test]
    fn non_nucleotide_bytes_are_unknown() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"A-G"), AminoAcid::Unknown);
        assert_eq!(table.translate_codon(b"AT"), AminoAcid::Unknown);
    }

    #[test]
    fn translate_short_orf() {
        let table = CodonTable::standard();
        // ATG GCA TGC TAA = M A C *
        let protein: Vec<u8> = translate(b"ATGGCATGCTAA", &table)
            .into_iter()
            .map(AminoAcid::to_byte)
            .collect();
        assert_eq!(protein, b"MAC*");
    }

    #[test]
    fn translate_drops_partial_codon() {
        let table = CodonTable::standard();
        assert_eq!(translate(b"ATGGC", &table), vec![aa(b'M')]);
        assert!(translate(b"", &table).is_empty());
    }

    #[test]
    fn three_letter_names() {
        assert_eq!(aa(b'M').three_letter(), "Met");
        assert_eq!(AminoAcid::Stop.three_letter(), "Stop");
        assert_eq!(AminoAcid::Unknown.three_letter(), "???");
        assert_eq!(AminoAcid::Unknown.to_string(), "X");
    }
}
