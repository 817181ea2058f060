use std::env;

fn main() {
    // Builds outside the napi CLI still need the variable napi-derive reads.
    if env::var("NAPI_RS_CLI_VERSION").is_err() {
        println!("cargo:rustc-env=NAPI_RS_CLI_VERSION=docchat-local");
    }
    println!("cargo:rerun-if-env-changed=NAPI_RS_CLI_VERSION");

    napi_build::setup();
}
