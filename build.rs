fn main() {
    // Embedded migrations are read by `sqlx::migrate!()` at compile time
    println!("cargo:rerun-if-changed=migrations");
}
