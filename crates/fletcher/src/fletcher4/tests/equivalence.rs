use super::*;
use super::{every_kernel, group_buffers, serial};

use test_support::{lcg_words, words_to_ne_bytes};

proptest! {
    #[test]
    fn every_kernel_matches_serial_reference(buf in group_buffers()) {
        let expected = serial(&buf);
        for (name, checksum) in every_kernel(&buf, ByteOrder::Native) {
            prop_assert_eq!(checksum, expected, "kernel {} diverged", name);
        }
    }

    #[test]
    fn kernels_are_deterministic(buf in group_buffers()) {
        let first = every_kernel(&buf, ByteOrder::Native);
        let second = every_kernel(&buf, ByteOrder::Native);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_input_finalizes_to_zero() {
    for (name, checksum) in every_kernel(&[], ByteOrder::Native) {
        assert_eq!(checksum, Checksum::ZERO, "kernel {name}");
    }
    for (name, checksum) in every_kernel(&[], ByteOrder::Byteswap) {
        assert_eq!(checksum, Checksum::ZERO, "kernel {name}");
    }
}

#[test]
fn base_case_for_every_kernel() {
    let buf = words_to_ne_bytes(&[1, 2, 3, 4]);
    for (name, checksum) in every_kernel(&buf, ByteOrder::Native) {
        assert_eq!(checksum.words(), [10, 20, 35, 56], "kernel {name}");
    }
}

#[test]
fn saturated_words_wrap_identically() {
    let buf = words_to_ne_bytes(&vec![u32::MAX; 65_536]);
    let expected = Checksum::new(
        0xffff_ffff_0000,
        0x8000_7fff_7fff_8000,
        0x2aaa_d554_d555_0000,
        0x1555_5554_dfff_c000,
    );
    for (name, checksum) in every_kernel(&buf, ByteOrder::Native) {
        assert_eq!(checksum, expected, "kernel {name}");
    }
}

#[test]
fn monotonic_and_adversarial_inputs_agree() {
    // Inputs where a wrong finalize weight would still look plausible.
    let ramp: Vec<u32> = (0..4096).collect();
    let alternating: Vec<u32> = (0..4096).map(|i| if i % 2 == 0 { u32::MAX } else { 1 }).collect();
    let random = lcg_words(4096, 0xdead_beef);

    for words in [ramp, alternating, random] {
        let buf = words_to_ne_bytes(&words);
        let expected = serial(&buf);
        for (name, checksum) in every_kernel(&buf, ByteOrder::Native) {
            assert_eq!(checksum, expected, "kernel {name}");
        }
    }
}
