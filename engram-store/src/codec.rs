//! Embedding BLOB codec: contiguous little-endian f32 bytes, length
//! implied by the dimension recorded in the meta row.

/// Pack an f32 slice into little-endian bytes.
pub fn embedding_to_blob(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Unpack a BLOB read together with the dimension. A length mismatch means
/// the embedding is treated as absent, never read at the wrong shape.
pub fn blob_to_embedding(bytes: &[u8], dim: usize) -> Option<Vec<f32>> {
    if bytes.len() != dim * 4 {
        return None;
    }
    let mut out = Vec::with_capacity(dim);
    for chunk in bytes.chunks_exact(4) {
        out.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let v = vec![0.25f32, -1.5, 3.75];
        let blob = embedding_to_blob(&v);
        assert_eq!(blob.len(), 12);
        assert_eq!(blob_to_embedding(&blob, 3), Some(v));
    }

    #[test]
    fn length_mismatch_is_absent() {
        let blob = embedding_to_blob(&[1.0, 2.0]);
        assert_eq!(blob_to_embedding(&blob, 3), None);
        assert_eq!(blob_to_embedding(&blob[..7], 2), None);
    }

    #[test]
    fn empty_blob_zero_dim() {
        assert_eq!(blob_to_embedding(&[], 0), Some(vec![]));
    }
}
