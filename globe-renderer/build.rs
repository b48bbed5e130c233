use config::Config;

const KEYS: [&str; 4] = [
    "texture_url",
    "coordinates_url",
    "auto_rotation_speed",
    "sphere_segments",
];

fn main() {
    println!("cargo::rerun-if-changed=../Settings.toml");

    let settings = Config::builder()
        .add_source(config::File::with_name("../Settings"))
        .add_source(config::Environment::with_prefix("GLOBE"))
        .build()
        .unwrap();

    for key in KEYS {
        println!(
            "cargo::rustc-env=GLOBE_{key}={}",
            settings.get_string(key).unwrap()
        );
    }
}
