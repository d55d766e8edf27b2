//! Basic usage example for the doe library.
//!
//! This example builds a two-level full factorial for an enzyme experiment,
//! screens the observed yields with Lenth's method, and shows a few of the
//! other design builders.

use doe::prelude::*;

fn main() {
    println!("doe Library - Basic Usage Example\n");

    let spec = FactorSpec::new([
        ("Temp", vec![50.0, 25.0]),
        ("Concentration", vec![0.4, 0.6]),
        ("Enzyme", vec![-1.0, 1.0]),
    ])
    .expect("Invalid factors");

    // 2^3 runs in standard order
    println!("Building two-level full factorial...");
    let design = TwoLevelFullFactorial.build(&spec).expect("Failed to build design");
    println!("  Runs: {}", design.runs());
    println!("{design}");

    let yields = [60.0, 52.0, 54.0, 45.0, 72.0, 83.0, 68.0, 80.0];
    let table = design
        .with_response("Yield", &yields)
        .expect("Response length mismatch");

    println!("Screening effects (10000 Monte Carlo trials)...");
    let result = screen(&table, &ScreeningConfig::default()).expect("Screening failed");
    println!("  PSE: {:.4}", result.pse);
    println!("{result}");

    for effect in result.significant(0.05) {
        println!("✓ {} is significant (p = {:.4})", effect.label(), effect.p_value);
    }
    println!();

    // Other designs over the same factors
    let fractional = FractionalFactorial::new(4);
    let plan = fractional.plan(&spec).expect("No fractional plan");
    println!("Half fraction generators: {:?}", plan.named_generators());

    let bb = BoxBehnken.build(&spec).expect("Failed to build Box-Behnken");
    println!("Box-Behnken runs: {}", bb.runs());

    let ccd = CentralComposite::new().build(&spec).expect("Failed to build CCD");
    println!("Central composite runs: {}", ccd.runs());

    let lhs = LatinHypercube::new(10, 42).build(&spec).expect("Failed to build LHS");
    println!("Latin hypercube runs: {}", lhs.runs());

    let pb_spec = FactorSpec::new((0..11).map(|i| (format!("X{i}"), vec![0.0, 1.0])))
        .expect("Invalid factors");
    let pb = PlackettBurman::new(12).build(&pb_spec).expect("Failed to build Plackett-Burman");
    println!("Plackett-Burman runs for 11 factors: {}", pb.runs());
}
