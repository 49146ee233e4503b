use super::alphabet::TokenBatch;
use super::encoder::EncoderError;
use crate::core::models::backbone::BackboneCoords;
use candle_core::{DType, Device, Tensor};
use std::collections::HashMap;

/// Learned representation of one partner, paired with its coordinates.
#[derive(Debug, Clone)]
pub struct PartnerEmbedding {
    pub sequence: String,
    /// `[L, D]` per-residue representations.
    pub residue_repr: Tensor,
    /// `[L, 3, 3]` sanitized backbone coordinates.
    pub coords: Tensor,
}

impl PartnerEmbedding {
    pub fn len(&self) -> usize {
        self.residue_repr.dims().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hidden_size(&self) -> usize {
        self.residue_repr.dims().get(1).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingBundle {
    pub partner1: PartnerEmbedding,
    pub partner2: PartnerEmbedding,
}

impl EmbeddingBundle {
    /// Splits a `[2, T, D]` encoder output back into per-partner embeddings.
    ///
    /// Special and padding tokens are dropped so each representation has exactly
    /// one row per residue.
    pub fn from_encoder_output(
        representations: &Tensor,
        batch: &TokenBatch,
        partners: [(&str, &BackboneCoords); 2],
        device: &Device,
    ) -> Result<Self, EncoderError> {
        let dims = representations.dims().to_vec();
        if dims.len() != 3 {
            return Err(EncoderError::Shape {
                actual: dims,
                reason: "expected [batch, tokens, hidden]".to_string(),
            });
        }
        if dims[0] != batch.batch_size() || dims[1] != batch.seq_len() {
            return Err(EncoderError::Shape {
                actual: dims,
                reason: format!(
                    "expected leading dimensions [{}, {}]",
                    batch.batch_size(),
                    batch.seq_len()
                ),
            });
        }

        let representations = representations.to_dtype(DType::F32)?;
        let [(seq1, coords1), (seq2, coords2)] = partners;
        let embed = |row: usize, sequence: &str, coords: &BackboneCoords| {
            let residue_repr = representations
                .get(row)?
                .narrow(0, batch.residue_offset, batch.lengths[row])?
                .contiguous()?;
            Ok::<_, EncoderError>(PartnerEmbedding {
                sequence: sequence.to_string(),
                residue_repr,
                coords: coords.to_tensor(device)?,
            })
        };

        Ok(Self {
            partner1: embed(0, seq1, coords1)?,
            partner2: embed(1, seq2, coords2)?,
        })
    }

    /// Named tensors for exchange with external model runtimes.
    pub fn named_tensors(&self) -> HashMap<String, Tensor> {
        HashMap::from([
            ("partner1.repr".to_string(), self.partner1.residue_repr.clone()),
            ("partner1.coords".to_string(), self.partner1.coords.clone()),
            ("partner2.repr".to_string(), self.partner2.residue_repr.clone()),
            ("partner2.coords".to_string(), self.partner2.coords.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::alphabet::Alphabet;

    fn fake_output(batch: &TokenBatch, hidden: usize) -> Tensor {
        let (b, t) = (batch.batch_size(), batch.seq_len());
        Tensor::arange(0f32, (b * t * hidden) as f32, &Device::Cpu)
            .unwrap()
            .reshape((b, t, hidden))
            .unwrap()
    }

    #[test]
    fn from_encoder_output_strips_specials_and_padding() {
        let batch = Alphabet::esm2()
            .batch_converter()
            .convert(&["MKV", "GA"], &Device::Cpu)
            .unwrap();
        let output = fake_output(&batch, 4);
        let c1 = BackboneCoords::zeros(3);
        let c2 = BackboneCoords::zeros(2);

        let bundle =
            EmbeddingBundle::from_encoder_output(&output, &batch, [("MKV", &c1), ("GA", &c2)], &Device::Cpu)
                .unwrap();

        assert_eq!(bundle.partner1.residue_repr.dims(), &[3, 4]);
        assert_eq!(bundle.partner2.residue_repr.dims(), &[2, 4]);
        assert_eq!(bundle.partner1.coords.dims(), &[3, 3, 3]);
        assert_eq!(bundle.partner1.hidden_size(), 4);
        // Row 0 starts at token 1 (after BOS): values 4..8.
        let first = bundle.partner1.residue_repr.to_vec2::<f32>().unwrap();
        assert_eq!(first[0], vec![4.0, 5.0, 6.0, 7.0]);
        // Row 1 starts at 5 tokens * 4 hidden + BOS offset.
        let second = bundle.partner2.residue_repr.to_vec2::<f32>().unwrap();
        assert_eq!(second[0], vec![24.0, 25.0, 26.0, 27.0]);
    }

    #[test]
    fn from_encoder_output_rejects_wrong_rank() {
        let batch = Alphabet::esm2()
            .batch_converter()
            .convert(&["A", "G"], &Device::Cpu)
            .unwrap();
        let output = Tensor::zeros((2, 3), DType::F32, &Device::Cpu).unwrap();
        let c = BackboneCoords::zeros(1);
        let result =
            EmbeddingBundle::from_encoder_output(&output, &batch, [("A", &c), ("G", &c)], &Device::Cpu);
        assert!(matches!(result, Err(EncoderError::Shape { .. })));
    }

    #[test]
    fn from_encoder_output_rejects_mismatched_token_count() {
        let batch = Alphabet::esm2()
            .batch_converter()
            .convert(&["A", "G"], &Device::Cpu)
            .unwrap();
        let output = Tensor::zeros((2, 7, 4), DType::F32, &Device::Cpu).unwrap();
        let c = BackboneCoords::zeros(1);
        let result =
            EmbeddingBundle::from_encoder_output(&output, &batch, [("A", &c), ("G", &c)], &Device::Cpu);
        assert!(matches!(result, Err(EncoderError::Shape { actual, .. }) if actual == vec![2, 7, 4]));
    }

    #[test]
    fn named_tensors_covers_both_partners() {
        let batch = Alphabet::esm2()
            .batch_converter()
            .convert(&["A", "G"], &Device::Cpu)
            .unwrap();
        let output = fake_output(&batch, 2);
        let c = BackboneCoords::zeros(1);
        let bundle =
            EmbeddingBundle::from_encoder_output(&output, &batch, [("A", &c), ("G", &c)], &Device::Cpu)
                .unwrap();
        let mut keys: Vec<_> = bundle.named_tensors().into_keys().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["partner1.coords", "partner1.repr", "partner2.coords", "partner2.repr"]
        );
    }
}
