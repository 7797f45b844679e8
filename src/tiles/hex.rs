//! 位图 → 十六进制字符串。
//!
//! 每行 `block_size` 位按最高位在左打包成一个字节，输出 `{:02X}`，
//! 各行自上而下拼接。行宽不超过 8 位（由配置校验保证）。

use std::fmt::Write;

pub fn encode_tile_hex(bitmap: &[u8], block_size: usize) -> String {
    if block_size == 0 {
        return String::new();
    }

    let mut hex = String::with_capacity(bitmap.len() / block_size * 2);
    for row in bitmap.chunks(block_size) {
        let byte = row.iter().fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit != 0));
        // String 的 fmt::Write 不会失败
        let _ = write!(hex, "{:02X}", byte);
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_tile_hex(hex: &str, block_size: usize) -> Vec<u8> {
        hex.as_bytes()
            .chunks(2)
            .flat_map(|pair| {
                let text = std::str::from_utf8(pair).unwrap();
                let byte = u8::from_str_radix(text, 16).unwrap();
                (0..block_size).rev().map(move |shift| (byte >> shift) & 1)
            })
            .collect()
    }

    #[test]
    fn packs_msb_first() {
        let mut bitmap = vec![0u8; 64];
        bitmap[0] = 1; // 第 0 行最左 → 0x80
        bitmap[15] = 1; // 第 1 行最右 → 0x01
        bitmap[56..64].fill(1); // 最后一行全亮 → 0xFF

        assert_eq!(encode_tile_hex(&bitmap, 8), "80010000000000FF");
    }

    #[test]
    fn known_patterns() {
        assert_eq!(encode_tile_hex(&[0; 64], 8), "0000000000000000");
        assert_eq!(encode_tile_hex(&[1; 64], 8), "FFFFFFFFFFFFFFFF");

        let checker: Vec<u8> = (0..64).map(|i| ((i / 8 + i % 8) % 2 == 0) as u8).collect();
        assert_eq!(encode_tile_hex(&checker, 8), "AA55AA55AA55AA55");
    }

    #[test]
    fn narrow_blocks_use_low_bits_and_uppercase() {
        // 4 位宽：1011 → 0x0B
        assert_eq!(encode_tile_hex(&[1, 0, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0], 4), "0B010F00");
    }

    proptest::proptest! {
        #[test]
        fn hex_round_trips_to_bitmap(
            block_size in 1usize..=8,
            seed_bits in proptest::collection::vec(0u8..=1, 64),
        ) {
            let bitmap: Vec<u8> = seed_bits[..block_size * block_size].to_vec();
            let hex = encode_tile_hex(&bitmap, block_size);

            proptest::prop_assert_eq!(hex.len(), block_size * 2);
            proptest::prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            proptest::prop_assert_eq!(decode_tile_hex(&hex, block_size), bitmap);
        }
    }
}
