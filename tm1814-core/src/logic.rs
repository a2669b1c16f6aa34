//! Pure Business Logic Functions
//!
//! Packen, Helligkeit und Leitungs-Kodierung ohne Hardware-Dependencies (testbar!)

use alloc::vec::Vec;

use crate::types::{BITS_PER_PIXEL, ColorWord, FREQ_HZ, RESET_GAP_US};

/// Symbole pro Datenbit (rpi_ws281x kodiert `1 -> 110`, `0 -> 100`)
pub const SYMBOLS_PER_BIT: u32 = 3;

/// Symbolrate auf der Leitung (3 × 800 kHz)
pub const SYMBOL_RATE_HZ: u32 = FREQ_HZ * SYMBOLS_PER_BIT;

/// Länge eines Datenbits in Nanosekunden
pub const BIT_PERIOD_NS: u32 = 1_000_000_000 / FREQ_HZ;

/// Bytes pro Pixel im kodierten Datenstrom
pub const WIRE_BYTES_PER_PIXEL: usize = (BITS_PER_PIXEL * SYMBOLS_PER_BIT / 8) as usize;

/// Bytes der Reset-Pause im kodierten Datenstrom
pub const RESET_GAP_BYTES: usize =
    ((RESET_GAP_US as u64 * SYMBOL_RATE_HZ as u64 / 1_000_000 + 7) / 8) as usize;

const SYMBOL_ONE: u32 = 0b110;
const SYMBOL_ZERO: u32 = 0b100;

/// Packt vier Kanäle in ein 32-Bit-Wort: `(W << 24) | (R << 16) | (G << 8) | B`
///
/// # Beispiele
///
/// ```
/// # use tm1814_core::logic::pack_wrgb;
/// assert_eq!(pack_wrgb(255, 0, 0, 0), 0x00FF_0000);
/// assert_eq!(pack_wrgb(0, 255, 0, 128), 0x8000_FF00);
/// ```
pub const fn pack_wrgb(r: u8, g: u8, b: u8, w: u8) -> u32 {
    (w as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Umkehrung von [`pack_wrgb`], liefert `(r, g, b, w)`
pub const fn unpack_wrgb(word: u32) -> (u8, u8, u8, u8) {
    let [w, r, g, b] = word.to_be_bytes();
    (r, g, b, w)
}

/// Skaliert einen Kanal wie rpi_ws281x beim Rendern: `(c * (brightness + 1)) >> 8`
///
/// Helligkeit 255 lässt den Wert unverändert.
pub const fn scale_channel(value: u8, brightness: u8) -> u8 {
    ((value as u16 * (brightness as u16 + 1)) >> 8) as u8
}

/// Skaliert alle vier Kanäle eines Worts
pub const fn scale_word(word: ColorWord, brightness: u8) -> ColorWord {
    let (r, g, b, w) = word.unpack();
    ColorWord::pack(
        scale_channel(r, brightness),
        scale_channel(g, brightness),
        scale_channel(b, brightness),
        scale_channel(w, brightness),
    )
}

/// Größe eines kodierten Frames inklusive Reset-Pause in Bytes
pub const fn frame_bytes(num_pixels: usize) -> usize {
    num_pixels * WIRE_BYTES_PER_PIXEL + RESET_GAP_BYTES
}

/// Dauer eines Frames inklusive Reset-Pause in Mikrosekunden
pub const fn frame_duration_us(num_pixels: usize) -> u64 {
    num_pixels as u64 * BITS_PER_PIXEL as u64 * BIT_PERIOD_NS as u64 / 1_000 + RESET_GAP_US as u64
}

/// Kodiert Pixel in den Symbol-Datenstrom der Leitung
///
/// MSB zuerst, danach die Reset-Pause als Ruhepegel. Bei `invert` wird jedes
/// Bit gekippt, auch der Ruhepegel.
pub fn encode_frame(words: &[ColorWord], invert: bool) -> Vec<u8> {
    let mut wire = Vec::with_capacity(frame_bytes(words.len()));
    let mut acc: u32 = 0;
    let mut pending: u32 = 0;

    for word in words {
        for bit in (0..BITS_PER_PIXEL).rev() {
            let symbol = if (word.0 >> bit) & 1 == 1 {
                SYMBOL_ONE
            } else {
                SYMBOL_ZERO
            };
            acc = (acc << SYMBOLS_PER_BIT) | symbol;
            pending += SYMBOLS_PER_BIT;
            if pending >= 8 {
                pending -= 8;
                wire.push((acc >> pending) as u8);
                acc &= (1 << pending) - 1;
            }
        }
    }
    // 96 Symbole pro Pixel: der Strom endet immer auf einer Byte-Grenze
    debug_assert_eq!(pending, 0);

    wire.resize(wire.len() + RESET_GAP_BYTES, 0);
    if invert {
        for byte in &mut wire {
            *byte = !*byte;
        }
    }
    wire
}
