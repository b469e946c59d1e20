fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &[
                "proto/telephony.proto",
                "proto/media.proto",
                "proto/stt.proto",
                "proto/dialog.proto",
                "proto/tts.proto",
                "proto/sip.proto",
            ],
            &["proto"],
        )?;
    Ok(())
}
