fn main() {
    // ESP-IDF build-environment propagation is only meaningful when the
    // espidf feature (and toolchain) is active; host test builds skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
