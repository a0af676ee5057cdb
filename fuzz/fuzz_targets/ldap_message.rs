#![no_main]
use ldap_codec_core::Codec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::default();
    let _ = codec.decode_message(data);
});
