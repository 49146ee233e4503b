use candle_core::{Device, Tensor};
use phf::{Map, phf_map};

pub const CLS_IDX: i64 = 0;
pub const PADDING_IDX: i64 = 1;
pub const EOS_IDX: i64 = 2;
pub const UNK_IDX: i64 = 3;

#[rustfmt::skip]
static ESM2_TOKENS: Map<char, i64> = phf_map! {
    'L' => 4,  'A' => 5,  'G' => 6,  'V' => 7,  'S' => 8,  'E' => 9,  'R' => 10,
    'T' => 11, 'I' => 12, 'D' => 13, 'P' => 14, 'K' => 15, 'Q' => 16, 'N' => 17,
    'F' => 18, 'Y' => 19, 'M' => 20, 'H' => 21, 'W' => 22, 'C' => 23, 'X' => 24,
    'B' => 25, 'U' => 26, 'Z' => 27, 'O' => 28, '.' => 29, '-' => 30,
};

/// The token vocabulary of a protein language model.
#[derive(Debug, Clone, Copy)]
pub struct Alphabet {
    tokens: &'static Map<char, i64>,
    pub prepend_bos: bool,
    pub append_eos: bool,
}

impl Alphabet {
    /// The vocabulary shared by every ESM-2 checkpoint.
    pub fn esm2() -> Self {
        Self {
            tokens: &ESM2_TOKENS,
            prepend_bos: true,
            append_eos: true,
        }
    }

    /// Token index of a residue character; anything outside the vocabulary is `<unk>`.
    pub fn index_of(&self, residue: char) -> i64 {
        self.tokens.get(&residue).copied().unwrap_or(UNK_IDX)
    }

    pub fn batch_converter(&self) -> BatchConverter {
        BatchConverter { alphabet: *self }
    }
}

/// A padded batch of tokenized sequences.
#[derive(Debug, Clone)]
pub struct TokenBatch {
    /// `[batch, max_len + specials]` i64 tokens.
    pub tokens: Tensor,
    /// Residue count of each sequence, in batch order.
    pub lengths: Vec<usize>,
    /// Position of the first residue token in each row.
    pub residue_offset: usize,
}

impl TokenBatch {
    pub fn batch_size(&self) -> usize {
        self.lengths.len()
    }

    pub fn seq_len(&self) -> usize {
        self.tokens.dims().get(1).copied().unwrap_or(0)
    }
}

/// Converts raw sequences into one padded token tensor.
#[derive(Debug, Clone, Copy)]
pub struct BatchConverter {
    alphabet: Alphabet,
}

impl BatchConverter {
    pub fn convert(&self, sequences: &[&str], device: &Device) -> candle_core::Result<TokenBatch> {
        let encoded: Vec<Vec<i64>> = sequences
            .iter()
            .map(|seq| seq.chars().map(|c| self.alphabet.index_of(c)).collect())
            .collect();
        let lengths: Vec<usize> = encoded.iter().map(Vec::len).collect();
        let max_len = lengths.iter().copied().max().unwrap_or(0);

        let bos = usize::from(self.alphabet.prepend_bos);
        let eos = usize::from(self.alphabet.append_eos);
        let width = max_len + bos + eos;

        let mut data = vec![PADDING_IDX; encoded.len() * width];
        for (row, tokens) in encoded.iter().enumerate() {
            let start = row * width;
            if bos == 1 {
                data[start] = CLS_IDX;
            }
            data[start + bos..start + bos + tokens.len()].copy_from_slice(tokens);
            if eos == 1 {
                data[start + bos + tokens.len()] = EOS_IDX;
            }
        }

        Ok(TokenBatch {
            tokens: Tensor::from_vec(data, (encoded.len(), width), device)?,
            lengths,
            residue_offset: bos,
        })
    }
}
