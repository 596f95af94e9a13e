use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::os::unix::io::AsRawFd;

use gatherv::{BufferedWriter, ReadSlot};
use proptest::prelude::*;

fn contents(file: &mut File) -> Vec<u8> {
    let mut buf = vec![];
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_end(&mut buf).unwrap();
    buf
}

fn regions() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..48)
}

proptest! {
    #[test]
    fn writev_concatenates_in_order(bufs in regions()) {
        let mut file = tempfile::tempfile().unwrap();
        let expected = bufs.concat();
        prop_assert_eq!(gatherv::write_slices(file.as_raw_fd(), &bufs).unwrap(), expected.len());
        prop_assert_eq!(contents(&mut file), expected);
    }

    #[test]
    fn automatic_flushes_compose(bufs in regions(), capacity in 1usize..8) {
        let mut file = tempfile::tempfile().unwrap();
        let mut reported = 0;
        {
            let mut writer = BufferedWriter::with_capacity(&file, capacity).unwrap();
            let mut batch = writer.batch();
            for (i, buf) in bufs.iter().enumerate() {
                reported += batch.write_bytes(buf).unwrap();
                prop_assert_eq!(batch.len(), (i + 1) % capacity);
                prop_assert_eq!(file.metadata().unwrap().len() as usize, reported);
            }
            reported += batch.flush().unwrap();
            prop_assert!(batch.is_empty());
        }
        let expected = bufs.concat();
        prop_assert_eq!(reported, expected.len());
        prop_assert_eq!(contents(&mut file), expected);
    }

    #[test]
    fn read_slots_truncate_to_available(data in prop::collection::vec(any::<u8>(), 0..128),
                                        lens in prop::collection::vec(1usize..32, 1..8)) {
        let mut file = tempfile::tempfile().unwrap();
        gatherv::write_slices(file.as_raw_fd(), &[&data]).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut slots: Vec<ReadSlot<'_>> = lens.iter().map(|&len| ReadSlot::with_len(len)).collect();
        let n = gatherv::read_slots(file.as_raw_fd(), &mut slots).unwrap();
        let requested: usize = lens.iter().sum();

        prop_assert_eq!(n, requested.min(data.len()));
        for (slot, &len) in slots.iter().zip(lens.iter()) {
            prop_assert_eq!(slot.len(), len);
        }
        prop_assert_eq!(gatherv::filled(&slots, n), &data[..n]);
    }
}
