pub mod labels;

use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;

use crate::errors::AppError;

pub use labels::{SkinCondition, LABEL_COUNT};

/// Spatial size the model expects on both axes.
pub const INPUT_SIZE: u32 = 224;
const CHANNELS: usize = 3;

/// Arg-max label and its score for one inference call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub label: SkinCondition,
    pub confidence: f32,
}

impl ClassificationResult {
    /// Interprets a raw model output vector.
    ///
    /// Scores already in `[0, 1]` are taken as probabilities; anything else is
    /// treated as logits and passed through softmax first. Ties resolve to the
    /// lowest index. No thresholding: a weak arg-max is still reported.
    pub fn from_scores(scores: &[f32]) -> Result<Self, AppError> {
        if scores.len() != LABEL_COUNT {
            return Err(AppError::Inference {
                message: format!(
                    "model returned {} scores, expected {LABEL_COUNT}",
                    scores.len()
                ),
            });
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(AppError::Inference {
                message: "model returned a non-finite score".to_string(),
            });
        }

        let probabilities = if scores.iter().all(|s| (0.0..=1.0).contains(s)) {
            scores.to_vec()
        } else {
            softmax(scores)
        };

        let (index, confidence) = probabilities
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &p)| if p > best.1 { (i, p) } else { best });

        let label = SkinCondition::from_index(index).ok_or_else(|| AppError::Inference {
            message: format!("score index {index} has no label"),
        })?;

        Ok(Self { label, confidence: confidence.clamp(0.0, 1.0) })
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::MIN, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// A decoded, resized, normalized RGB raster in NHWC layout `[1, 224, 224, 3]`.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "onnx-classifier"), allow(dead_code))]
pub struct PreparedImage {
    pixels: Vec<f32>,
}

impl PreparedImage {
    #[cfg(any(test, feature = "onnx-classifier"))]
    pub fn shape() -> [usize; 4] {
        [1, INPUT_SIZE as usize, INPUT_SIZE as usize, CHANNELS]
    }

    #[cfg(any(test, feature = "onnx-classifier"))]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// Decodes any supported image format and prepares it for the model.
pub fn preprocess(bytes: &[u8]) -> Result<PreparedImage, AppError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AppError::ImageDecode { message: e.to_string() })?;
    let rgb = decoded.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);
    let pixels = resized
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect::<Vec<f32>>();
    debug_assert_eq!(pixels.len(), (INPUT_SIZE * INPUT_SIZE) as usize * CHANNELS);
    Ok(PreparedImage { pixels })
}

/// The frozen model: a fixed-size vector in, one score per label out.
pub trait ImageModel: Send + Sync {
    fn scores(&self, image: &PreparedImage) -> Result<Vec<f32>, AppError>;
}

/// Handle to the image classifier, resolved once at startup.
#[derive(Clone)]
pub enum ClassifierClient {
    Ready(Arc<dyn ImageModel>),
    Unavailable { reason: String },
}

impl ClassifierClient {
    /// Loads the model at `path`. Failure is not fatal: the returned handle is
    /// `Unavailable` and image handling degrades for the process lifetime.
    pub fn load(path: &Path) -> Self {
        #[cfg(feature = "onnx-classifier")]
        {
            match onnx::OnnxModel::load(path) {
                Ok(model) => {
                    tracing::info!("Image model loaded from {}", path.display());
                    ClassifierClient::Ready(Arc::new(model))
                }
                Err(e) => {
                    tracing::error!("Error loading image model from {}: {e}", path.display());
                    ClassifierClient::Unavailable { reason: e.to_string() }
                }
            }
        }
        #[cfg(not(feature = "onnx-classifier"))]
        {
            tracing::warn!(
                "Built without the onnx-classifier feature; image model at {} not loaded",
                path.display()
            );
            ClassifierClient::Unavailable {
                reason: "built without the onnx-classifier feature".to_string(),
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ClassifierClient::Ready(_))
    }

    pub fn classify(&self, image: &PreparedImage) -> Result<ClassificationResult, AppError> {
        match self {
            ClassifierClient::Ready(model) => ClassificationResult::from_scores(&model.scores(image)?),
            ClassifierClient::Unavailable { reason } => {
                Err(AppError::ModelUnavailable { reason: reason.clone() })
            }
        }
    }

    /// Decodes and classifies raw image bytes off the async runtime.
    pub async fn classify_bytes(&self, bytes: Vec<u8>) -> Result<ClassificationResult, AppError> {
        if let ClassifierClient::Unavailable { reason } = self {
            return Err(AppError::ModelUnavailable { reason: reason.clone() });
        }
        let client = self.clone();
        tokio::task::spawn_blocking(move || {
            let image = preprocess(&bytes)?;
            client.classify(&image)
        })
        .await
        .map_err(|e| AppError::Unexpected(format!("classifier task failed: {e}")))?
    }
}

// ═══════════════════════════════════════════════════════════
// ONNX backend, behind the `onnx-classifier` feature
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx-classifier")]
mod onnx {
    use super::{ImageModel, PreparedImage};
    use crate::errors::AppError;
    use ort::session::Session;
    use std::path::Path;
    use std::sync::Mutex;

    /// Uses a Mutex because `Session::run` requires `&mut self`.
    pub struct OnnxModel {
        session: Mutex<Session>,
    }

    impl OnnxModel {
        pub fn load(path: &Path) -> Result<Self, AppError> {
            if !path.exists() {
                return Err(AppError::ModelUnavailable {
                    reason: format!("model file not found: {}", path.display()),
                });
            }
            let init = |e: ort::Error| AppError::ModelUnavailable { reason: e.to_string() };
            let session = Session::builder()
                .map_err(init)?
                .with_intra_threads(2)
                .map_err(init)?
                .commit_from_file(path)
                .map_err(|e: ort::Error| AppError::ModelUnavailable {
                    reason: format!("ONNX load failed: {e}"),
                })?;
            Ok(Self { session: Mutex::new(session) })
        }
    }

    impl ImageModel for OnnxModel {
        fn scores(&self, image: &PreparedImage) -> Result<Vec<f32>, AppError> {
            use ort::value::TensorRef;

            let input = ndarray::Array4::from_shape_vec(PreparedImage::shape(), image.pixels().to_vec())
                .map_err(|e| AppError::Inference { message: e.to_string() })?;
            let tensor = TensorRef::from_array_view(&input)
                .map_err(|e| AppError::Inference { message: e.to_string() })?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| AppError::Inference { message: "session lock poisoned".to_string() })?;
            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| AppError::Inference { message: format!("ONNX inference failed: {e}") })?;

            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| AppError::Inference { message: format!("output extraction: {e}") })?;
            Ok(data.to_vec())
        }
    }
}
