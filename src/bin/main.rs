use std::{error::Error, fs, path};

use clap::Parser;
use yaml_rust::YamlLoader;

use stellar_riemann::{Capabilities, RiemannConfig, Tube1d};

#[derive(Parser)]
pub struct Cli {
    /// The path to the config file to read
    #[clap(parse(from_os_str))]
    pub config: path::PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    // parse command line parameters
    let args = Cli::parse();

    // read configuration
    let docs = YamlLoader::load_from_str(&fs::read_to_string(args.config)?)?;
    let config = &docs[0];

    let caps = Capabilities::from_yaml(config)?;
    let riemann_cfg = RiemannConfig::from_yaml(config)?;
    riemann_cfg.check_capabilities(&caps)?;

    let gamma = config["hydrodynamics"]["gamma"].as_f64().unwrap_or(1.4);
    let n_zones = config["tube"]["n_zones"].as_i64().unwrap_or(256) as usize;
    let t_end = config["tube"]["t_end"].as_f64().unwrap_or(0.2);
    let cfl = config["tube"]["cfl"].as_f64().unwrap_or(0.5);

    // run the Sod tube under the configured solver
    let mut tube = Tube1d::sod(n_zones, gamma, riemann_cfg);
    let steps = tube.run_to(t_end, cfl)?;

    println!(
        "sod tube: {} zones, gamma = {}, t_end = {}, {} steps",
        n_zones, gamma, t_end, steps
    );
    println!("{:>10} {:>14} {:>14} {:>14}", "x", "rho", "u", "p");
    let prim = tube.primitive_layout();
    let stride = (n_zones / 16).max(1);
    for i in (0..n_zones).step_by(stride) {
        let x = (i as f64 + 0.5) / n_zones as f64;
        let zone = tube.zone(i);
        println!(
            "{:>10.4} {:>14.6e} {:>14.6e} {:>14.6e}",
            x,
            zone[prim.qrho],
            zone[prim.vel(0)],
            zone[prim.qpres]
        );
    }

    println!("Done!");
    Ok(())
}
