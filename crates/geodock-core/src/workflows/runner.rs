use crate::core::io::loader::{PdbLoader, StructureLoadError, StructureLoader};
use crate::core::models::backbone::BackboneCoords;
use crate::core::models::partner::{PartnerError, PartnerStructure};
use crate::engine::alphabet::{Alphabet, BatchConverter};
use crate::engine::backend::ModelBackend;
use crate::engine::checkpoint::Checkpoint;
use crate::engine::config::RunnerConfig;
use crate::engine::device::select_device;
use crate::engine::embedding::EmbeddingBundle;
use crate::engine::encoder::SequenceEncoder;
use crate::engine::error::RunnerError;
use crate::engine::predictor::{
    DockingInput, DockingPredictor, PredictedComplex, PredictorError, output_file_path,
};
use crate::engine::progress::{Progress, ProgressReporter};
use candle_core::Device;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseTimings {
    pub embedding: Duration,
    pub docking: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockingResult {
    pub complex: PredictedComplex,
    /// Where the complex was written, if an output location was given.
    pub output_path: Option<PathBuf>,
    pub timings: PhaseTimings,
    pub peak_memory_bytes: Option<u64>,
}

pub struct DockingRunner {
    device: Device,
    encoder: Box<dyn SequenceEncoder>,
    batch_converter: BatchConverter,
    predictor: Box<dyn DockingPredictor>,
    loader: Box<dyn StructureLoader>,
    default_output: Option<PathBuf>,
}

impl DockingRunner {
    /// Selects the device and loads both models.
    ///
    /// The checkpoint is validated before anything is loaded, so a bad path never
    /// starts the encoder.
    #[instrument(skip_all, name = "runner_init")]
    pub fn new(
        config: &RunnerConfig,
        backend: &dyn ModelBackend,
        reporter: &ProgressReporter,
    ) -> Result<Self, RunnerError> {
        reporter.report(Progress::PhaseStart {
            name: "Loading models",
        });

        let device = select_device(config.device)?;
        info!("Using device: {:?}", device);

        let checkpoint = Checkpoint::open(&config.checkpoint_path)?;
        debug!(
            path = %checkpoint.path().display(),
            bytes = checkpoint.size_bytes(),
            "Checkpoint resolved."
        );

        let encoder = backend.load_encoder(&config.encoder_model, &device)?;
        reporter.report(Progress::Message(format!(
            "Loaded encoder {}",
            config.encoder_model
        )));
        let predictor = backend.load_predictor(&checkpoint, &device)?;
        reporter.report(Progress::Message("Loaded docking model".to_string()));

        reporter.report(Progress::PhaseFinish);

        Ok(Self::from_parts(encoder, predictor, Box::new(PdbLoader::default()), device)
            .with_default_output(config.output_path.clone()))
    }

    /// Assembles a runner from already loaded handles.
    pub fn from_parts(
        encoder: Box<dyn SequenceEncoder>,
        predictor: Box<dyn DockingPredictor>,
        loader: Box<dyn StructureLoader>,
        device: Device,
    ) -> Self {
        Self {
            device,
            encoder,
            batch_converter: Alphabet::esm2().batch_converter(),
            predictor,
            loader,
            default_output: None,
        }
    }

    pub fn with_loader(mut self, loader: Box<dyn StructureLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Output used by [`DockingRunner::dock`] when the call names none.
    pub fn with_default_output(mut self, path: Option<PathBuf>) -> Self {
        self.default_output = path;
        self
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Embeds both partners with one encoder forward pass.
    ///
    /// Coordinates are passed through unchanged; callers sanitize them first.
    pub fn embed(
        &self,
        sequence1: &str,
        sequence2: &str,
        coords1: &BackboneCoords,
        coords2: &BackboneCoords,
    ) -> Result<EmbeddingBundle, RunnerError> {
        check_partner("partner 1", sequence1, coords1)?;
        check_partner("partner 2", sequence2, coords2)?;

        let start = Instant::now();
        let batch = self
            .batch_converter
            .convert(&[sequence1, sequence2], &self.device)
            .map_err(|e| RunnerError::Encoding(e.into()))?;
        debug!(tokens = ?batch.tokens.dims(), "Tokenized partners.");

        let representations = self.encoder.encode(&batch.tokens)?;
        let bundle = EmbeddingBundle::from_encoder_output(
            &representations,
            &batch,
            [(sequence1, coords1), (sequence2, coords2)],
            &self.device,
        )?;

        info!(
            "Completed embedding in {:.2} seconds.",
            start.elapsed().as_secs_f64()
        );
        Ok(bundle)
    }

    /// Docks the partners stored at `partner1` and `partner2`.
    ///
    /// With an output name (or a configured default) the complex is written as PDB;
    /// otherwise nothing touches the filesystem.
    pub fn dock(
        &self,
        partner1: &Path,
        partner2: &Path,
        out_name: Option<&Path>,
    ) -> Result<DockingResult, RunnerError> {
        self.dock_with_progress(partner1, partner2, out_name, &ProgressReporter::new())
    }

    #[instrument(skip_all, name = "docking_workflow", fields(partner1 = %partner1.display(), partner2 = %partner2.display()))]
    pub fn dock_with_progress(
        &self,
        partner1: &Path,
        partner2: &Path,
        out_name: Option<&Path>,
        reporter: &ProgressReporter,
    ) -> Result<DockingResult, RunnerError> {
        let (first, second) = reporter.phase("Loading partners", || {
            Ok::<_, RunnerError>((
                self.load_partner(partner1)?,
                self.load_partner(partner2)?,
            ))
        })?;

        let embed_start = Instant::now();
        let embeddings = reporter.phase("Embedding", || {
            self.embed(
                &first.sequence,
                &second.sequence,
                &first.coords,
                &second.coords,
            )
        })?;
        let embedding = embed_start.elapsed();

        let dock_start = Instant::now();
        let prediction = reporter.phase("Docking", || {
            self.predictor.predict(&DockingInput {
                sequence1: &first.sequence,
                sequence2: &second.sequence,
                embeddings: &embeddings,
            })
        })?;
        check_prediction(&prediction.complex, &first, &second)?;
        let docking = dock_start.elapsed();
        info!(
            "Completed docking in {:.2} seconds.",
            docking.as_secs_f64()
        );
        if let Some(bytes) = prediction.peak_memory_bytes {
            info!(
                "Peak memory usage: {:.2} MB",
                bytes as f64 / (1024.0 * 1024.0)
            );
        }

        let output_path = match out_name.or(self.default_output.as_deref()) {
            Some(name) => {
                let path = output_file_path(name);
                reporter.phase("Writing output", || {
                    prediction
                        .complex
                        .write_pdb(&path)
                        .map_err(|source| RunnerError::Output {
                            path: path.clone(),
                            source,
                        })
                })?;
                info!("Wrote predicted complex to '{}'.", path.display());
                Some(path)
            }
            None => None,
        };

        Ok(DockingResult {
            complex: prediction.complex,
            output_path,
            timings: PhaseTimings { embedding, docking },
            peak_memory_bytes: prediction.peak_memory_bytes,
        })
    }

    fn load_partner(&self, path: &Path) -> Result<PartnerStructure, RunnerError> {
        let partner = self.loader.load(path)?;
        partner
            .validate()
            .map_err(|source| StructureLoadError::Partner {
                path: path.to_path_buf(),
                source,
            })?;
        if partner.coords.has_nan() {
            debug!(path = %path.display(), "Replacing missing backbone coordinates.");
        }
        Ok(partner.sanitized())
    }
}

fn check_partner(
    partner: &'static str,
    sequence: &str,
    coords: &BackboneCoords,
) -> Result<(), StructureLoadError> {
    let sequence_len = sequence.chars().count();
    let source = if sequence_len == 0 {
        PartnerError::NoResidues
    } else if sequence_len != coords.len() {
        PartnerError::LengthMismatch {
            sequence_len,
            coords_len: coords.len(),
        }
    } else {
        return Ok(());
    };
    Err(StructureLoadError::Invalid { partner, source })
}

fn check_prediction(
    complex: &PredictedComplex,
    first: &PartnerStructure,
    second: &PartnerStructure,
) -> Result<(), PredictorError> {
    for (predicted, input) in [(&complex.partner1, first), (&complex.partner2, second)] {
        if predicted.coords.len() != input.len() {
            return Err(PredictorError::ResidueCount {
                expected: input.len(),
                actual: predicted.coords.len(),
            });
        }
    }
    Ok(())
}
