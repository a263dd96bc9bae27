use std::env;

fn main() {
    if env::var("CARGO_FEATURE_RAYON").is_ok() {
        println!("cargo:warning=Using the 'rayon' feature runs starts in parallel; the returned result collection stays deterministic, but per-start diagnostics may interleave on stderr.");
    }
}
