#![no_main]

use libfuzzer_sys::fuzz_target;
use tessera_layout::{LayoutConfig, LayoutTree, Size, SizeCalculator, validate};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let width = u32::from(u16::from_le_bytes([data[0], data[1]]));
    let height = u32::from(u16::from_le_bytes([data[2], data[3]]));
    let Ok(json) = std::str::from_utf8(&data[4..]) else {
        return;
    };
    let Ok(tree) = LayoutTree::from_json(json) else {
        return;
    };

    // Serialization must round-trip whatever parsed.
    let encoded = tree.to_json().expect("parsed trees serialize");
    let reparsed = LayoutTree::from_json(&encoded).expect("own output parses");
    assert_eq!(reparsed, tree);

    if validate(&tree).is_err() {
        return;
    }
    let calc = SizeCalculator::new(LayoutConfig::default());
    for move_mode in [false, true] {
        let sizes = calc.compute(&tree, Size::new(width, height), None, move_mode);
        for key in tree.keys() {
            assert!(sizes.contains_key(key), "missing size for {key}");
        }
    }
});
