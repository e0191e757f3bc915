// Frame reader and ordered frame writer.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::Bytes;
    use rlepack_core::stream::framing::{encode_frame, encode_frame_header, FrameError, FrameHeader, FrameRecord};
    use rlepack_core::stream::io::{read_frame, FrameReader, OrderedFrameWriter, WriteOrder};
    use rlepack_core::types::StreamError;

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn frame(index: u64, payload: &'static [u8]) -> FrameRecord {
        FrameRecord::new(index, Bytes::from_static(payload))
    }

    fn indices_on_wire(wire: &[u8]) -> Vec<u64> {
        FrameReader::new(Cursor::new(wire))
            .map(|f| f.unwrap().index())
            .collect()
    }

    // ------------------------------------------------------------
    // Reader
    // ------------------------------------------------------------
    #[test]
    fn reads_frames_until_clean_eof() {
        let mut wire = encode_frame(&frame(0, b"a\x01")).unwrap();
        wire.extend(encode_frame(&frame(1, b"b\x02")).unwrap());

        let mut r = Cursor::new(wire);
        assert_eq!(read_frame(&mut r).unwrap().unwrap().index(), 0);
        assert_eq!(read_frame(&mut r).unwrap().unwrap().payload, Bytes::from_static(b"b\x02"));
        assert!(read_frame(&mut r).unwrap().is_none());
    }

    #[test]
    fn partial_header_is_end_of_stream() {
        let mut wire = encode_frame(&frame(0, b"a\x01")).unwrap();
        wire.extend_from_slice(&[0u8; 7]);

        let mut reader = FrameReader::new(Cursor::new(wire));
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().is_none());
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn short_last_payload_is_malformed() {
        let mut wire = encode_frame(&frame(0, b"x\x03")).unwrap();
        wire.extend_from_slice(&encode_frame_header(&FrameHeader::new(1, 10)));
        wire.extend_from_slice(&[1, 2, 3, 4]);

        let results: Vec<_> = FrameReader::new(Cursor::new(wire)).collect();
        assert_eq!(results.len(), 2, "reader stops after the first error");
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(StreamError::Frame(FrameError::Truncated { index: 1, declared: 10, available: 4 }))
        ));
    }

    // ------------------------------------------------------------
    // Writer
    // ------------------------------------------------------------
    #[test]
    fn index_order_parks_early_frames() {
        let mut w = OrderedFrameWriter::new(Vec::new(), WriteOrder::Index);
        w.push(frame(2, b"c\x01")).unwrap();
        w.push(frame(1, b"b\x01")).unwrap();
        assert_eq!(w.frames_written(), 0);
        assert_eq!(w.pending(), 2);

        w.push(frame(0, b"a\x01")).unwrap();
        assert_eq!(w.frames_written(), 3);
        assert_eq!(w.pending(), 0);
        assert_eq!(w.bytes_written(), 3 * (FrameHeader::LEN as u64 + 2));
        assert_eq!(w.peak_pending(), 3);

        let wire = w.finish().unwrap();
        assert_eq!(indices_on_wire(&wire), vec![0, 1, 2]);
    }

    #[test]
    fn completion_order_writes_immediately() {
        let mut w = OrderedFrameWriter::new(Vec::new(), WriteOrder::Completion);
        w.push(frame(1, b"b\x01")).unwrap();
        w.push(frame(0, b"a\x01")).unwrap();
        assert_eq!(w.frames_written(), 2);
        assert_eq!(w.peak_pending(), 0);

        let wire = w.finish().unwrap();
        assert_eq!(indices_on_wire(&wire), vec![1, 0]);
    }

    #[test]
    fn gap_in_indices_fails_finish() {
        let mut w = OrderedFrameWriter::new(Vec::new(), WriteOrder::Index);
        w.push(frame(0, b"a\x01")).unwrap();
        w.push(frame(2, b"c\x01")).unwrap();

        assert!(matches!(
            w.finish(),
            Err(StreamError::Frame(FrameError::MissingIndex { expected: 1, pending: 1 }))
        ));
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let mut w = OrderedFrameWriter::new(Vec::new(), WriteOrder::Index);
        w.push(frame(0, b"a\x01")).unwrap();
        assert!(matches!(
            w.push(frame(0, b"a\x01")),
            Err(StreamError::Validation(_))
        ));
    }
}
