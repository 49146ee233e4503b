use candle_core::{Device, Tensor};
use nalgebra::Point3;

/// Names of the backbone atoms recorded per residue, in storage order.
pub const BACKBONE_ATOMS: [&str; 3] = ["N", "CA", "C"];

/// Backbone coordinates of one residue: `N`, `CA`, `C`.
pub type ResidueBackbone = [Point3<f32>; 3];

/// Per-residue backbone coordinates of one partner.
///
/// Missing atoms are stored as NaN so that the array stays parallel to the
/// sequence. Call [`BackboneCoords::sanitized`] before handing coordinates to a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackboneCoords(Vec<ResidueBackbone>);

impl BackboneCoords {
    pub fn new(residues: Vec<ResidueBackbone>) -> Self {
        Self(residues)
    }

    /// A backbone of `len` residues with every coordinate at the origin.
    pub fn zeros(len: usize) -> Self {
        Self(vec![[Point3::origin(); 3]; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn residues(&self) -> &[ResidueBackbone] {
        &self.0
    }

    pub fn iter_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.0
            .iter()
            .flat_map(|res| res.iter())
            .flat_map(|p| p.coords.iter().copied())
    }

    pub fn has_nan(&self) -> bool {
        self.iter_values().any(f32::is_nan)
    }

    /// Returns a copy with NaN replaced by `0.0`, `+inf` by `f32::MAX` and
    /// `-inf` by `f32::MIN`.
    pub fn sanitized(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|res| res.map(|p| p.map(sanitize_value)))
                .collect(),
        )
    }

    /// Flattens the coordinates into an `[L, 3, 3]` f32 tensor.
    pub fn to_tensor(&self, device: &Device) -> candle_core::Result<Tensor> {
        let data: Vec<f32> = self.iter_values().collect();
        Tensor::from_vec(data, (self.len(), BACKBONE_ATOMS.len(), 3), device)
    }

    /// Rebuilds coordinates from an `[L, 3, 3]` tensor.
    pub fn from_tensor(tensor: &Tensor) -> candle_core::Result<Self> {
        let rows = tensor
            .to_dtype(candle_core::DType::F32)?
            .to_vec3::<f32>()?;
        let mut residues = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != BACKBONE_ATOMS.len() || row.iter().any(|xyz| xyz.len() != 3) {
                return Err(candle_core::Error::Msg(format!(
                    "expected backbone tensor of shape [L, 3, 3], got {:?}",
                    tensor.dims()
                )));
            }
            residues.push([
                Point3::new(row[0][0], row[0][1], row[0][2]),
                Point3::new(row[1][0], row[1][1], row[1][2]),
                Point3::new(row[2][0], row[2][1], row[2][2]),
            ]);
        }
        Ok(Self(residues))
    }
}

impl From<Vec<ResidueBackbone>> for BackboneCoords {
    fn from(residues: Vec<ResidueBackbone>) -> Self {
        Self(residues)
    }
}

fn sanitize_value(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else if v == f32::INFINITY {
        f32::MAX
    } else if v == f32::NEG_INFINITY {
        f32::MIN
    } else {
        v
    }
}
