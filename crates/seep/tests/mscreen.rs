//! Multi-screen, storage and connector wells: solved boundary conditions
//! verified in the Laplace domain.

use num_complex::Complex64;
use seep::{MaqConfig, Model, Well};

fn two_aquifer_config() -> MaqConfig {
    MaqConfig {
        kaq: vec![1.0, 2.0],
        z: vec![4.0, 3.0, 2.0, 0.0],
        c: vec![200.0],
        saq: vec![3e-3, 4e-3],
        sll: vec![1e-20],
        tmin: 0.1,
        tmax: 1.0,
        m: 20,
        ..Default::default()
    }
}

#[test]
fn test_mscreen_discharge_sum_and_uniform_head() {
    let qtot = 3.0;
    let mut ml = Model::maq(&two_aquifer_config()).unwrap();
    let id = ml.add(Well::mscreen(0.0, 0.0, 0.1, qtot, &[0, 1]));
    ml.solve().unwrap();

    let el = ml.element(id).unwrap();
    let params = el.parameters();
    let strength = el.strengthinflayer(&ml.aquifer, &ml.grid);
    for k in 0..ml.grid.np() {
        // layer strengths sum to Qtot / p at every Laplace parameter
        let total = params[(0, k)] * strength[(0, k)] + params[(1, k)] * strength[(1, k)];
        let expected = qtot / ml.grid.p[k];
        assert!(
            (total - expected).norm() < 1e-10 * expected.norm(),
            "discharge sum at parameter {}: {} vs {}",
            k,
            total,
            expected
        );
    }

    // uniform head across the two screens at the control point
    let (xc, yc) = el.control_point().unwrap();
    let phi = ml.phi(xc, yc).unwrap();
    for k in 0..ml.grid.np() {
        let h0 = phi[(0, k)] / ml.aquifer.data.t[0];
        let h1 = phi[(1, k)] / ml.aquifer.data.t[1];
        assert!(
            (h0 - h1).norm() < 1e-8 * h0.norm().max(1e-12),
            "head mismatch at parameter {}: {} vs {}",
            k,
            h0,
            h1
        );
    }
}

#[test]
fn test_mscreen_res_head_differences_match_skin_losses() {
    let qtot = 3.0;
    let c_entry = 0.5;
    let mut ml = Model::maq(&two_aquifer_config()).unwrap();
    let id = ml.add(Well::mscreen_res(0.0, 0.0, 0.1, qtot, c_entry, &[0, 1]));
    ml.solve().unwrap();

    let el = ml.element(id).unwrap();
    let params = el.parameters();
    let strength = el.strengthinflayer(&ml.aquifer, &ml.grid);
    let rf = el.resistance_factor().unwrap();
    let (xc, yc) = el.control_point().unwrap();
    let phi = ml.phi(xc, yc).unwrap();
    for k in 0..ml.grid.np() {
        let mut corrected = [Complex64::new(0.0, 0.0); 2];
        for l in 0..2 {
            let h = phi[(l, k)] / ml.aquifer.data.t[l];
            let skin = rf[l] * params[(l, k)] * strength[(l, k)] / ml.aquifer.data.t[l];
            corrected[l] = h - skin;
        }
        assert!(
            (corrected[0] - corrected[1]).norm() < 1e-8 * corrected[0].norm().max(1e-12),
            "skin-corrected heads differ at parameter {}: {} vs {}",
            k,
            corrected[0],
            corrected[1]
        );
        let total = params[(0, k)] + params[(1, k)];
        assert!(
            (total - Complex64::new(qtot, 0.0)).norm() < 1e-10 * qtot,
            "strength sum at parameter {}: {}",
            k,
            total
        );
    }
}

#[test]
fn test_hconn_zero_net_discharge() {
    let mut ml = Model::maq(&two_aquifer_config()).unwrap();
    let id = ml.add(Well::hconn(0.0, 0.0, 0.1, &[5.0], &[0, 1]));
    // a pumped well in the bottom aquifer drives the connector flow
    ml.add(Well::new(20.0, 0.0, 0.1, &[2.0], &[1]));
    ml.solve().unwrap();

    let el = ml.element(id).unwrap();
    let params = el.parameters();
    let strength = el.strengthinflayer(&ml.aquifer, &ml.grid);
    let mut scale = 0.0f64;
    for k in 0..ml.grid.np() {
        scale = scale.max(params[(0, k)].norm());
    }
    assert!(scale > 0.0, "connector carries no flow at all");
    for k in 0..ml.grid.np() {
        let total = params[(0, k)] + params[(1, k)];
        assert!(
            total.norm() < 1e-10 * scale,
            "net connector discharge at parameter {}: {}",
            k,
            total
        );
    }

    // head drop across the connector equals resistance times discharge
    let (xc, yc) = el.control_point().unwrap();
    let phi = ml.phi(xc, yc).unwrap();
    for k in 0..ml.grid.np() {
        let h0 = phi[(0, k)] / ml.aquifer.data.t[0];
        let h1 = phi[(1, k)] / ml.aquifer.data.t[1];
        let drop = 5.0 * strength[(0, k)] * params[(0, k)];
        assert!(
            ((h0 - h1) - drop).norm() < 1e-8 * h0.norm().max(1e-12),
            "connector head drop at parameter {}: {} vs {}",
            k,
            h0 - h1,
            drop
        );
    }
}

#[test]
fn test_resistance_well_borehole_head() {
    // behind the entry resistance the borehole holds the specified head
    let hc = 2.0;
    let mut ml = Model::maq(&MaqConfig {
        kaq: vec![10.0],
        z: vec![10.0, 0.0],
        saq: vec![1e-4],
        tmin: 1.0,
        tmax: 100.0,
        m: 20,
        ..Default::default()
    })
    .unwrap();
    let id = ml.add(Well::resistance(0.0, 0.0, 0.1, &[hc], 0.5, &[0]));
    ml.solve().unwrap();

    let times = [2.0, 20.0, 90.0];
    let inside = ml.head_inside(id, &times).unwrap();
    for (j, &t) in times.iter().enumerate() {
        assert!(
            (inside[(0, j)] - hc).abs() < 1e-5,
            "borehole head at t = {} is {}",
            t,
            inside[(0, j)]
        );
    }
    // the well injects to hold a positive head, so the aquifer head at the
    // wall sits below the borehole head
    let at_wall = ml.head(0.0, 0.0, &times).unwrap();
    assert!(at_wall[(0, 0)] < hc);
    let s = ml.strength(id, &times).unwrap();
    assert!(s[(0, 0)] != 0.0);
}

#[test]
fn test_internal_storage_well_balance() {
    let qtot = 1.0;
    let (rw, rc, res) = (0.1, 0.1, 0.1);
    let mut ml = Model::maq(&MaqConfig {
        kaq: vec![1.0],
        z: vec![1.0, 0.0],
        saq: vec![0.003],
        tmin: 1.0,
        tmax: 100.0,
        m: 20,
        ..Default::default()
    })
    .unwrap();
    let id = ml.add(Well::internal_storage(0.0, 0.0, rw, qtot, &[0], rc, res));
    ml.solve().unwrap();

    let el = ml.element(id).unwrap();
    let params = el.parameters();
    let strength = el.strengthinflayer(&ml.aquifer, &ml.grid);
    let (xc, yc) = el.control_point().unwrap();
    let phi = ml.phi(xc, yc).unwrap();
    let area = std::f64::consts::PI * rc * rc;
    let haq0 = ml.aquifer.data.haq[0];
    for k in 0..ml.grid.np() {
        let p = ml.grid.p[k];
        let h0 = phi[(0, k)] / ml.aquifer.data.t[0];
        let disterm =
            res / (2.0 * std::f64::consts::PI * rw * haq0) * params[(0, k)] * strength[(0, k)];
        let q = params[(0, k)] - area * p * h0 + area * p * disterm;
        let expected = qtot / p;
        assert!(
            (q - expected).norm() < 1e-8 * expected.norm(),
            "storage balance at parameter {}: {} vs {}",
            k,
            q,
            expected
        );
    }
}

#[test]
fn test_internal_storage_slug_well_balance() {
    let (rw, rc, res) = (0.1, 0.1, 0.1);
    let qtot = std::f64::consts::PI * rw * rw * 3.0; // slug volume
    let mut ml = Model::maq(&MaqConfig {
        kaq: vec![1.0],
        z: vec![1.0, 0.0],
        saq: vec![0.003],
        tmin: 1.0,
        tmax: 100.0,
        m: 20,
        ..Default::default()
    })
    .unwrap();
    let id = ml.add(Well::internal_storage_slug(0.0, 0.0, rw, qtot, &[0], rc, res));
    ml.solve().unwrap();

    let el = ml.element(id).unwrap();
    let params = el.parameters();
    let strength = el.strengthinflayer(&ml.aquifer, &ml.grid);
    let (xc, yc) = el.control_point().unwrap();
    let phi = ml.phi(xc, yc).unwrap();
    let area = std::f64::consts::PI * rc * rc;
    let haq0 = ml.aquifer.data.haq[0];
    for k in 0..ml.grid.np() {
        let p = ml.grid.p[k];
        let h0 = phi[(0, k)] / ml.aquifer.data.t[0];
        let disterm =
            res / (2.0 * std::f64::consts::PI * rw * haq0) * params[(0, k)] * strength[(0, k)];
        // no 1/p on the right-hand side: the slug injects instantaneously
        let q = params[(0, k)] - area * p * h0 + area * p * disterm;
        assert!(
            (q - Complex64::new(qtot, 0.0)).norm() < 1e-8 * qtot,
            "slug balance at parameter {}: {} vs {}",
            k,
            q,
            qtot
        );
    }
}
