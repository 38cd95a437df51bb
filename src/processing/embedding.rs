use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::errors::{PipelineError, PipelineResult};
use crate::models::config::MatcherConfig;
use crate::repository::{EmbeddingReader, EmbeddingWriter, RepositoryError};

/// Maps text into the shared vector space.
///
/// Implementations must be deterministic and must accept empty strings.
pub trait TextEmbedder {
    /// Name under which this model's vectors are cached.
    fn model_name(&self) -> &str;

    /// Length of every vector this model produces.
    fn dimension(&self) -> usize;

    /// Embeds `texts`, returning one vector per input in the same order.
    fn embed_many(&mut self, texts: &[String]) -> PipelineResult<Vec<Vec<f32>>>;

    fn embed(&mut self, text: &str) -> PipelineResult<Vec<f32>> {
        self.embed_many(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or(PipelineError::EmbeddingCount {
                expected: 1,
                actual: 0,
            })
    }
}

/// Resolves a configured model name to a fastembed model.
pub fn parse_embedding_model(name: &str) -> PipelineResult<EmbeddingModel> {
    match name {
        "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "multilingual-e5-large" => Ok(EmbeddingModel::MultilingualE5Large),
        other => Err(PipelineError::Configuration(format!(
            "unknown embedding model '{other}'"
        ))),
    }
}

/// Local ONNX sentence-embedding model.
pub struct FastTextEmbedder {
    model: TextEmbedding,
    model_name: String,
    dimension: usize,
}

impl FastTextEmbedder {
    /// Loads the configured model, downloading it on first use.
    pub fn try_new(config: &MatcherConfig) -> PipelineResult<Self> {
        let model = parse_embedding_model(&config.embedding_model)?;

        let mut options = InitOptions::new(model)
            .with_max_length(config.max_tokens)
            .with_show_download_progress(false);
        if let Some(dir) = &config.model_cache_dir {
            options = options.with_cache_dir(PathBuf::from(dir));
        }

        let mut model = TextEmbedding::try_new(options).map_err(|error| {
            PipelineError::Embedding(format!("Failed to initialize embedder: {error:?}"))
        })?;

        // The model card is not consulted; the vector length is measured.
        let dimension = model
            .embed(vec![""], None)
            .map_err(|error| {
                PipelineError::Embedding(format!("Failed to measure dimension: {error:?}"))
            })?
            .first()
            .map(Vec::len)
            .ok_or(PipelineError::EmbeddingCount {
                expected: 1,
                actual: 0,
            })?;

        log::info!(
            "Loaded embedding model {} ({dimension} dimensions)",
            config.embedding_model
        );

        Ok(Self {
            model,
            model_name: config.embedding_model.clone(),
            dimension,
        })
    }
}

impl TextEmbedder for FastTextEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_many(&mut self, texts: &[String]) -> PipelineResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.model
            .embed(texts.to_vec(), None)
            .map_err(|error| PipelineError::Embedding(format!("{error:?}")))
    }
}

/// True when every component is a finite number.
pub(crate) fn is_finite_vector(vector: &[f32]) -> bool {
    vector.iter().all(|value| value.is_finite())
}

/// Checks that `vectors` holds exactly `expected` finite vectors of
/// `dimension` values each.
pub(crate) fn validate_embeddings(
    vectors: &[Vec<f32>],
    expected: usize,
    dimension: usize,
) -> PipelineResult<()> {
    if vectors.len() != expected {
        return Err(PipelineError::EmbeddingCount {
            expected,
            actual: vectors.len(),
        });
    }
    if let Some(vector) = vectors.iter().find(|vector| vector.len() != dimension) {
        return Err(PipelineError::DimensionMismatch {
            expected: dimension,
            actual: vector.len(),
        });
    }
    if !vectors.iter().all(|vector| is_finite_vector(vector)) {
        return Err(PipelineError::NonFiniteEmbedding);
    }
    Ok(())
}

/// Load embeddings from the cache when present, otherwise generate and
/// persist them.
///
/// Texts missing from the cache are embedded in a single batch. Returns the
/// embeddings in input order and the number newly generated.
pub(crate) fn load_or_generate_embeddings<E, R>(
    texts: &[&str],
    embedder: &mut E,
    cache: &R,
) -> PipelineResult<(Vec<Vec<f32>>, usize)>
where
    E: TextEmbedder + ?Sized,
    R: EmbeddingReader + EmbeddingWriter + ?Sized,
{
    let model_name = embedder.model_name().to_string();
    let dimension = embedder.dimension();

    let mut resolved: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
    let mut missing: Vec<usize> = Vec::new();
    for (index, text) in texts.iter().enumerate() {
        let cached = match cache.get_embedding(&model_name, text) {
            Ok(cached) => cached,
            Err(RepositoryError::Corrupt(reason)) => {
                log::warn!("Discarding cached embedding: {reason}");
                None
            }
            Err(error) => return Err(error.into()),
        };
        match cached {
            Some(vector) if vector.len() == dimension && is_finite_vector(&vector) => {
                resolved.push(Some(vector))
            }
            Some(_) => {
                log::warn!("Discarding malformed cached embedding for model {model_name}");
                missing.push(index);
                resolved.push(None);
            }
            None => {
                missing.push(index);
                resolved.push(None);
            }
        }
    }

    if !missing.is_empty() {
        let inputs: Vec<String> = missing.iter().map(|&i| texts[i].to_string()).collect();
        let generated = embedder.embed_many(&inputs)?;
        validate_embeddings(&generated, inputs.len(), dimension)?;

        for (&index, vector) in missing.iter().zip(generated) {
            cache.set_embedding(&model_name, texts[index], &vector)?;
            resolved[index] = Some(vector);
        }
    }

    let embeddings = resolved.into_iter().flatten().collect::<Vec<_>>();
    validate_embeddings(&embeddings, texts.len(), dimension)?;

    Ok((embeddings, missing.len()))
}
