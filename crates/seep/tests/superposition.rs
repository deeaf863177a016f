//! Linearity: superposition of elements and step-response equivalence.

use seep::{MaqConfig, Model, Well};

fn base_config() -> MaqConfig {
    MaqConfig {
        kaq: vec![10.0],
        z: vec![10.0, 0.0],
        saq: vec![1e-5],
        tmin: 1.0,
        tmax: 1e3,
        m: 20,
        ..Default::default()
    }
}

#[test]
fn test_laplace_domain_superposition_is_exact() {
    let mut ml_a = Model::maq(&base_config()).unwrap();
    ml_a.add(Well::new(0.0, 0.0, 0.1, &[80.0], &[0]));
    ml_a.solve().unwrap();

    let mut ml_b = Model::maq(&base_config()).unwrap();
    ml_b.add(Well::new(15.0, 10.0, 0.1, &[-40.0], &[0]));
    ml_b.solve().unwrap();

    let mut ml_ab = Model::maq(&base_config()).unwrap();
    ml_ab.add(Well::new(0.0, 0.0, 0.1, &[80.0], &[0]));
    ml_ab.add(Well::new(15.0, 10.0, 0.1, &[-40.0], &[0]));
    ml_ab.solve().unwrap();

    for &(x, y) in &[(3.0, 4.0), (40.0, -20.0)] {
        let pa = ml_a.phi(x, y).unwrap();
        let pb = ml_b.phi(x, y).unwrap();
        let pab = ml_ab.phi(x, y).unwrap();
        for k in 0..ml_ab.grid.np() {
            let sum = pa[(0, k)] + pb[(0, k)];
            assert!(
                (pab[(0, k)] - sum).norm() <= 1e-12 * sum.norm().max(1e-12),
                "Laplace superposition at ({}, {}), parameter {}: {} vs {}",
                x,
                y,
                k,
                pab[(0, k)],
                sum
            );
        }
    }
}

#[test]
fn test_time_domain_superposition() {
    let mut ml_a = Model::maq(&base_config()).unwrap();
    ml_a.add(Well::new(0.0, 0.0, 0.1, &[80.0], &[0]));
    ml_a.solve().unwrap();

    let mut ml_b = Model::maq(&base_config()).unwrap();
    ml_b.add(Well::new(15.0, 10.0, 0.1, &[-40.0], &[0]));
    ml_b.solve().unwrap();

    let mut ml_ab = Model::maq(&base_config()).unwrap();
    ml_ab.add(Well::new(0.0, 0.0, 0.1, &[80.0], &[0]));
    ml_ab.add(Well::new(15.0, 10.0, 0.1, &[-40.0], &[0]));
    ml_ab.solve().unwrap();

    let times = [2.0, 30.0, 500.0];
    for &(x, y) in &[(3.0, 4.0), (40.0, -20.0)] {
        let ha = ml_a.head(x, y, &times).unwrap();
        let hb = ml_b.head(x, y, &times).unwrap();
        let hab = ml_ab.head(x, y, &times).unwrap();
        for j in 0..times.len() {
            let sum = ha[(0, j)] + hb[(0, j)];
            // the transform accelerates each field separately, so agreement
            // is bounded by the inversion accuracy, not machine precision
            assert!(
                (hab[(0, j)] - sum).abs() < 1e-6,
                "superposition at ({}, {}), t = {}: {} vs {}",
                x,
                y,
                times[j],
                hab[(0, j)],
                sum
            );
        }
    }
}

#[test]
fn test_single_step_schedule_equals_mscreen_well() {
    // a one-breakpoint schedule starting at t = 0 is a plain step well
    let q0 = 55.0;

    let mut ml_step = Model::maq(&base_config()).unwrap();
    ml_step.add(Well::mscreen(0.0, 0.0, 0.1, q0, &[0]));
    ml_step.solve().unwrap();

    let mut ml_vdis = Model::maq(&base_config()).unwrap();
    ml_vdis.add(Well::vdis_mscreen(0.0, 0.0, 0.1, &[0.0], &[q0], 0));
    ml_vdis.solve().unwrap();

    let times = [1.5, 12.0, 130.0, 950.0];
    let h_step = ml_step.head(20.0, 5.0, &times).unwrap();
    let h_vdis = ml_vdis.vdis_head_wells(20.0, 5.0, &times).unwrap();
    for j in 0..times.len() {
        assert!(
            (h_step[(0, j)] - h_vdis[(0, j)]).abs() < 1e-8 * h_step[(0, j)].abs().max(1e-10),
            "t = {}: step {} vs schedule {}",
            times[j],
            h_step[(0, j)],
            h_vdis[(0, j)]
        );
    }
}

#[test]
fn test_vdis_head_single_element_matches_wells_variant() {
    let mut ml = Model::maq(&base_config()).unwrap();
    ml.add(Well::vdis_mscreen(0.0, 0.0, 0.1, &[0.0, 10.0], &[30.0, 10.0], 0));
    ml.solve().unwrap();

    let times = [2.0, 15.0, 300.0];
    let a = ml.vdis_head(12.0, 0.0, &times).unwrap();
    let b = ml.vdis_head_wells(12.0, 0.0, &times).unwrap();
    for j in 0..times.len() {
        assert!(
            (a[(0, j)] - b[(0, j)]).abs() < 1e-12,
            "t = {}: {} vs {}",
            times[j],
            a[(0, j)],
            b[(0, j)]
        );
    }
}
