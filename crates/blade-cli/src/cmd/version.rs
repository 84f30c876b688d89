//! Version command

use blade_core::runtime::{HostRuntime, NativeRuntime};

/// Print the blade version and host platform.
pub fn version() {
    let runtime = NativeRuntime;
    println!(
        "blade version {} {}/{}",
        env!("BLADE_VERSION"),
        runtime.os(),
        runtime.arch()
    );
}
