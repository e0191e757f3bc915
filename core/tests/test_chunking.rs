// Chunk source: fixed windows, monotonic indices, short final chunk.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rlepack_core::constants::DEFAULT_CHUNK_SIZE;
    use rlepack_core::stream::chunking::{Chunk, ChunkReader};

    fn collect(data: Vec<u8>, chunk_size: usize) -> Vec<Chunk> {
        ChunkReader::new(Cursor::new(data), chunk_size)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn one_and_a_half_chunks_yield_two() {
        let data = vec![0xABu8; DEFAULT_CHUNK_SIZE + DEFAULT_CHUNK_SIZE / 2];
        let chunks = collect(data, DEFAULT_CHUNK_SIZE);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].data.len(), DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].data.len(), DEFAULT_CHUNK_SIZE / 2);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let chunks = collect(vec![1u8; 300], 100);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.data.len() == 100));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect(Vec::new(), 64).is_empty());
    }

    #[test]
    fn indices_are_dense_and_data_concatenates_back() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let chunks = collect(data.clone(), 64);

        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.index, i as u64);
        }
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
        assert_eq!(joined, data);
    }
}
