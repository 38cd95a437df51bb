use bytemuck::{cast_slice, pod_collect_to_vec};
use chrono::Utc;
use diesel::prelude::*;

use crate::repository::{
    DieselRepository, EmbeddingReader, EmbeddingWriter, RepositoryError, RepositoryResult,
};

fn decode_embedding(blob: &[u8]) -> RepositoryResult<Vec<f32>> {
    if blob.len() % size_of::<f32>() != 0 {
        return Err(RepositoryError::Corrupt(format!(
            "blob of {} bytes is not a sequence of f32 values",
            blob.len()
        )));
    }
    Ok(pod_collect_to_vec::<u8, f32>(blob))
}

impl EmbeddingReader for DieselRepository {
    fn get_embedding(&self, model_name: &str, text: &str) -> RepositoryResult<Option<Vec<f32>>> {
        use crate::repository::schema::supplier_embeddings;

        let mut conn = self.conn()?;

        let blob = supplier_embeddings::table
            .filter(supplier_embeddings::model.eq(model_name))
            .filter(supplier_embeddings::input_text.eq(text))
            .select(supplier_embeddings::embedding)
            .first::<Vec<u8>>(&mut conn)
            .optional()?;

        blob.as_deref().map(decode_embedding).transpose()
    }
}

impl EmbeddingWriter for DieselRepository {
    fn set_embedding(
        &self,
        model_name: &str,
        text: &str,
        embedding: &[f32],
    ) -> RepositoryResult<usize> {
        use crate::repository::schema::supplier_embeddings;

        let mut conn = self.conn()?;

        // Convert &[f32] to &[u8]
        let blob: Vec<u8> = cast_slice(embedding).to_vec();

        let affected = diesel::replace_into(supplier_embeddings::table)
            .values((
                supplier_embeddings::model.eq(model_name),
                supplier_embeddings::input_text.eq(text),
                supplier_embeddings::embedding.eq(blob),
                supplier_embeddings::created_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::decode_embedding;
    use crate::repository::RepositoryError;

    #[test]
    fn decode_rejects_truncated_blob() {
        let result = decode_embedding(&[0, 0, 128]);

        assert!(matches!(result, Err(RepositoryError::Corrupt(_))));
    }

    #[test]
    fn decode_reads_native_f32_bytes() {
        let values = [1.5_f32, -2.0];
        let blob: Vec<u8> = bytemuck::cast_slice(&values).to_vec();

        assert_eq!(decode_embedding(&blob).unwrap(), vec![1.5, -2.0]);
    }
}
