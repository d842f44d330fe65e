fn main() {
    // Emits the ESP-IDF link arguments when building for espidf targets;
    // a no-op on host targets (no ESP-IDF environment present).
    embuild::espidf::sysenv::output();
}
