#[cfg(target_arch = "wasm32")]
fn main() {
    invitation::io::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("invitation-frontend runs in the browser; build it for wasm32-unknown-unknown");
}
