use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Audio format constants for captured PCM audio
pub const SAMPLE_RATE: u32 = 16000;
pub const BYTES_PER_SAMPLE: u32 = 2; // s16le (16-bit signed integer)
pub const CHANNELS: u32 = 1; // mono

/// Wraps raw PCM capture data into WAV files for the model request
pub struct WavEncoder;

impl WavEncoder {
    /// Convert raw PCM bytes to WAV format by prepending a 44-byte WAV header
    ///
    /// The generated WAV file uses the capture format: 16000 Hz, 16-bit
    /// signed little-endian samples, mono, PCM (format code 1).
    ///
    /// # Arguments
    ///
    /// * `pcm_data` - Raw PCM audio data (16kHz, 16-bit, mono)
    ///
    /// # Returns
    ///
    /// A `Vec<u8>` containing the complete WAV file (header + PCM data)
    ///
    /// # Errors
    ///
    /// Returns an error if the PCM data is too large (> 4GB, WAV format limitation)
    pub fn from_pcm_bytes(pcm_data: &[u8]) -> Result<Vec<u8>, String> {
        // WAV format limit: u32 chunk sizes (4GB - 8 bytes for RIFF header)
        let data_size = pcm_data.len() as u64;
        if data_size > (u32::MAX as u64 - 36) {
            return Err(format!(
                "PCM data too large ({} bytes). WAV format supports maximum {} bytes",
                data_size,
                u32::MAX as u64 - 36
            ));
        }

        let header = Self::wav_header(pcm_data.len() as u32);

        let mut wav_data = Vec::with_capacity(header.len() + pcm_data.len());
        wav_data.extend_from_slice(&header);
        wav_data.extend_from_slice(pcm_data);

        Ok(wav_data)
    }

    /// Build a standard 44-byte WAV header for `data_size` bytes of PCM audio.
    ///
    /// Layout: "RIFF" + file size, "WAVE", "fmt " subchunk (PCM, channels,
    /// sample rate, byte rate, block align, bits per sample), "data" + size.
    fn wav_header(data_size: u32) -> [u8; 44] {
        let byte_rate = SAMPLE_RATE * CHANNELS * BYTES_PER_SAMPLE;
        let block_align = (CHANNELS * BYTES_PER_SAMPLE) as u16;
        let bits_per_sample = (BYTES_PER_SAMPLE * 8) as u16;

        let mut header = [0u8; 44];
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&(data_size + 36).to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes()); // subchunk1 size (PCM)
        header[20..22].copy_from_slice(&1u16.to_le_bytes()); // audio format (PCM)
        header[22..24].copy_from_slice(&(CHANNELS as u16).to_le_bytes());
        header[24..28].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
        header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&block_align.to_le_bytes());
        header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&data_size.to_le_bytes());

        header
    }
}

/// Encode WAV bytes as a `data:audio/wav;base64,` URI for use as an entry's
/// audio reference.
///
/// Every byte is encoded in original order with the standard base64 alphabet,
/// no compression or resampling.
pub fn audio_data_uri(wav_data: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", STANDARD.encode(wav_data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_header_structure() {
        // 32000 bytes of PCM data = 1 second at 16kHz, 16-bit, mono
        let data_size = 32000u32;
        let header = WavEncoder::wav_header(data_size);

        assert_eq!(header.len(), 44);
        assert_eq!(&header[0..4], b"RIFF");

        let file_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(file_size, data_size + 36);

        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");

        let audio_format = u16::from_le_bytes([header[20], header[21]]);
        assert_eq!(audio_format, 1);

        let num_channels = u16::from_le_bytes([header[22], header[23]]);
        assert_eq!(num_channels, 1);

        let sample_rate = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);
        assert_eq!(sample_rate, 16000);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 32000);

        let bits_per_sample = u16::from_le_bytes([header[34], header[35]]);
        assert_eq!(bits_per_sample, 16);

        assert_eq!(&header[36..40], b"data");

        let data_chunk_size = u32::from_le_bytes([header[40], header[41], header[42], header[43]]);
        assert_eq!(data_chunk_size, data_size);
    }

    #[test]
    fn test_from_pcm_bytes_prepends_header() {
        let pcm_data = vec![7u8; 1000];
        let wav_data = WavEncoder::from_pcm_bytes(&pcm_data).unwrap();

        assert_eq!(wav_data.len(), 44 + 1000);
        assert_eq!(&wav_data[0..4], b"RIFF");
        // PCM data is intact after the header
        assert_eq!(&wav_data[44..], &pcm_data[..]);
    }

    #[test]
    fn test_from_pcm_bytes_empty() {
        let wav_data = WavEncoder::from_pcm_bytes(&[]).unwrap();
        assert_eq!(wav_data.len(), 44);

        let data_size = u32::from_le_bytes([wav_data[40], wav_data[41], wav_data[42], wav_data[43]]);
        assert_eq!(data_size, 0);
    }

    #[test]
    fn test_audio_data_uri_prefix_and_payload() {
        let uri = audio_data_uri(b"RIFF");
        assert!(uri.starts_with("data:audio/wav;base64,"));
        assert_eq!(&uri["data:audio/wav;base64,".len()..], "UklGRg==");
    }
}
