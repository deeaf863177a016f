//! 1-D strip elements: head-specified strip against a closed boundary.

use seep::{MaqConfig, Model, OneD};

#[test]
fn test_head_strip_fills_closed_domain() {
    // strip holds h = 1 at x = 0; impermeable boundary at x = 50
    let mut ml = Model::maq(&MaqConfig {
        kaq: vec![1.0],
        z: vec![1.0, 0.0],
        saq: vec![1e-3],
        tmin: 0.01,
        tmax: 10.0,
        m: 20,
        ..Default::default()
    })
    .unwrap();
    ml.add(OneD::head_specified_bounded(&[1.0], &[0], 50.0));
    ml.solve().unwrap();

    // head at the closed boundary rises toward the strip head
    let times = [0.02, 0.1, 0.5, 2.0, 10.0];
    let h = ml.head(50.0, 0.0, &times).unwrap();
    for j in 1..times.len() {
        assert!(
            h[(0, j)] >= h[(0, j - 1)] - 1e-8,
            "head at the boundary not monotone: h({}) = {} < h({}) = {}",
            times[j],
            h[(0, j)],
            times[j - 1],
            h[(0, j - 1)]
        );
    }
    assert!(
        h[(0, times.len() - 1)] > 0.5 && h[(0, times.len() - 1)] < 1.0 + 1e-6,
        "late-time head at the boundary is {}",
        h[(0, times.len() - 1)]
    );
}

#[test]
fn test_head_strip_holds_condition_at_origin() {
    let mut ml = Model::maq(&MaqConfig {
        kaq: vec![1.0],
        z: vec![1.0, 0.0],
        saq: vec![1e-3],
        tmin: 0.01,
        tmax: 10.0,
        m: 20,
        ..Default::default()
    })
    .unwrap();
    ml.add(OneD::head_specified_bounded(&[1.0], &[0], 50.0));
    ml.solve().unwrap();

    let h = ml.head(0.0, 0.0, &[0.05, 1.0, 8.0]).unwrap();
    for j in 0..3 {
        assert!(
            (h[(0, j)] - 1.0).abs() < 1e-6,
            "head at the strip is {} at sample {}",
            h[(0, j)],
            j
        );
    }
}

#[test]
fn test_infinite_strip_decays_with_distance() {
    let mut ml = Model::maq(&MaqConfig {
        kaq: vec![1.0],
        z: vec![1.0, 0.0],
        saq: vec![1e-3],
        tmin: 0.01,
        tmax: 10.0,
        m: 20,
        ..Default::default()
    })
    .unwrap();
    ml.add(OneD::new(&[1.0], &[0]));
    ml.solve().unwrap();

    let t = [1.0];
    let h0 = ml.head(1.0, 0.0, &t).unwrap();
    let h1 = ml.head(20.0, 0.0, &t).unwrap();
    let h2 = ml.head(60.0, 0.0, &t).unwrap();
    assert!(
        h0[(0, 0)] > h1[(0, 0)] && h1[(0, 0)] > h2[(0, 0)],
        "strip influence should decay: {} {} {}",
        h0[(0, 0)],
        h1[(0, 0)],
        h2[(0, 0)]
    );
    assert!(h0[(0, 0)] > 0.0);
}
