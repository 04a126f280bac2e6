use super::Point3;

/// Samples a quadratic Bezier curve with `samples` intervals.
///
/// Returns `samples + 1` points including both ends. `samples` of zero is
/// treated as one.
#[must_use]
pub fn quadratic(p0: &Point3, control: &Point3, p2: &Point3, samples: usize) -> Vec<Point3> {
    let n = samples.max(1);
    (0..=n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / n as f64;
            let mt = 1.0 - t;
            Point3::from(
                p0.coords * (mt * mt) + control.coords * (2.0 * mt * t) + p2.coords * (t * t),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_hits_ends_and_bulges_toward_control() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);
        let pts = quadratic(&a, &c, &b, 4);
        assert_eq!(pts.len(), 5);
        assert!((pts[0] - a).norm() < 1e-12);
        assert!((pts[4] - b).norm() < 1e-12);
        // Midpoint of a quadratic Bezier: (p0 + 2c + p2) / 4.
        assert!((pts[2] - Point3::new(0.25, 0.25, 0.0)).norm() < 1e-12);
    }
}
