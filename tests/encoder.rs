mod tests {
    use myrtio_ws2812_dma::encoder::{BYTES_PER_CHANNEL, SYMBOLS_PER_BIT, encode_led};
    use myrtio_ws2812_dma::{
        BYTES_PER_LED, DecodeError, Rgb, Symbol, buffer_size, decode_byte, decode_frame,
        encode_byte, encode_frame,
    };

    const ZERO_GROUP: [u8; 4] = [0x88; 4];
    const ONE_GROUP: [u8; 4] = [0xCC; 4];

    #[test]
    fn test_symbol_patterns() {
        assert_eq!(Symbol::Zero.pattern(), 0b1000);
        assert_eq!(Symbol::One.pattern(), 0b1100);
        assert_eq!(Symbol::Zero.high_units(), 1);
        assert_eq!(Symbol::One.high_units(), 2);
        assert_eq!(Symbol::from_bit(true), Symbol::One);
        assert_eq!(Symbol::from_bit(false), Symbol::Zero);
    }

    #[test]
    fn test_symbol_from_pattern_rejects_other_values() {
        for pattern in 0u8..16 {
            let expected = match pattern {
                0b1000 => Some(Symbol::Zero),
                0b1100 => Some(Symbol::One),
                _ => None,
            };
            assert_eq!(Symbol::from_pattern(pattern), expected);
        }
    }

    #[test]
    fn test_encode_byte_extremes() {
        assert_eq!(encode_byte(0xFF), ONE_GROUP);
        assert_eq!(encode_byte(0x00), ZERO_GROUP);
    }

    #[test]
    fn test_encode_byte_is_msb_first() {
        // 1010_0101
        assert_eq!(encode_byte(0xA5), [0xC8, 0xC8, 0x8C, 0x8C]);
        // only the top bit set lands in the high nibble of the first byte
        assert_eq!(encode_byte(0x80), [0xC8, 0x88, 0x88, 0x88]);
        assert_eq!(encode_byte(0x01), [0x88, 0x88, 0x88, 0x8C]);
    }

    #[test]
    fn test_byte_round_trip() {
        for value in 0..=u8::MAX {
            let encoded = encode_byte(value);
            assert_eq!(encoded.len(), BYTES_PER_CHANNEL);
            assert_eq!(decode_byte(encoded), Ok(value), "value {value:#04x}");
        }
    }

    #[test]
    fn test_decode_byte_reports_offending_byte() {
        assert_eq!(
            decode_byte([0xFF, 0x88, 0x88, 0x88]),
            Err(DecodeError::InvalidSymbol { offset: 0 })
        );
        assert_eq!(
            decode_byte([0x88, 0x88, 0x8F, 0x88]),
            Err(DecodeError::InvalidSymbol { offset: 2 })
        );
        assert_eq!(
            decode_byte([0x88, 0x88, 0x88, 0x00]),
            Err(DecodeError::InvalidSymbol { offset: 3 })
        );
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(SYMBOLS_PER_BIT, 4);
        assert_eq!(BYTES_PER_CHANNEL, 4);
        assert_eq!(BYTES_PER_LED, 12);
        for leds in 1..=64 {
            assert_eq!(buffer_size(leds), leds * 12);
        }
    }

    #[test]
    fn test_led_is_grb_on_the_wire() {
        let mut out = [0u8; BYTES_PER_LED];
        encode_led(Rgb { r: 0x01, g: 0x02, b: 0x03 }, &mut out);
        assert_eq!(out[0..4], encode_byte(0x02));
        assert_eq!(out[4..8], encode_byte(0x01));
        assert_eq!(out[8..12], encode_byte(0x03));
    }

    #[test]
    fn test_single_red_led_frame() {
        let mut colors = [Rgb::default(); 8];
        colors[0] = Rgb { r: 255, g: 0, b: 0 };
        let mut out = [0u8; 96];

        assert_eq!(encode_frame(&colors, &mut out), 96);
        assert_eq!(out[0..4], ZERO_GROUP);
        assert_eq!(out[4..8], ONE_GROUP);
        assert_eq!(out[8..12], ZERO_GROUP);
        assert!(out[12..].iter().all(|&byte| byte == 0x88));
    }

    #[test]
    fn test_uniform_colors_give_identical_blocks() {
        let colors = [Rgb { r: 12, g: 200, b: 77 }; 8];
        let mut out = [0u8; 96];
        encode_frame(&colors, &mut out);

        let first = &out[..BYTES_PER_LED];
        for block in out.chunks_exact(BYTES_PER_LED) {
            assert_eq!(block, first);
        }
    }

    #[test]
    fn test_encode_frame_stops_at_short_output() {
        let colors = [Rgb { r: 1, g: 1, b: 1 }; 4];
        let mut out = [0u8; 30];
        assert_eq!(encode_frame(&colors, &mut out), 24);
        assert!(out[24..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_frame_round_trip() {
        let colors = [
            Rgb { r: 255, g: 0, b: 0 },
            Rgb { r: 0, g: 255, b: 0 },
            Rgb { r: 0, g: 0, b: 255 },
            Rgb { r: 18, g: 52, b: 86 },
        ];
        let mut wire = [0u8; 48];
        encode_frame(&colors, &mut wire);

        let mut decoded = [Rgb::default(); 4];
        assert_eq!(decode_frame(&wire, &mut decoded), Ok(4));
        assert_eq!(decoded, colors);
    }

    #[test]
    fn test_decode_frame_errors() {
        let mut out = [Rgb::default(); 2];
        assert_eq!(
            decode_frame(&[0x88; 13], &mut out),
            Err(DecodeError::Truncated { len: 13 })
        );

        let mut wire = [0x88u8; 24];
        wire[17] = 0x00;
        assert_eq!(
            decode_frame(&wire, &mut out),
            Err(DecodeError::InvalidSymbol { offset: 17 })
        );
    }

    #[test]
    fn test_decode_frame_limited_by_output() {
        let wire = [0xCCu8; 36];
        let mut out = [Rgb::default(); 2];
        assert_eq!(decode_frame(&wire, &mut out), Ok(2));
        assert_eq!(out, [Rgb { r: 255, g: 255, b: 255 }; 2]);
    }
}
