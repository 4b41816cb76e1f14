// src/utils/geometry.rs

pub type Point3 = [f64; 3];

pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn len(a: Point3) -> f64 {
    dot(a, a).sqrt()
}

pub fn distance(a: Point3, b: Point3) -> f64 {
    len(sub(a, b))
}

/// Point a fraction `t` of the way from `a` to `b`
pub fn lerp(a: Point3, b: Point3, t: f64) -> Point3 {
    add(a, scale(sub(b, a), t))
}

/// True when every point lies within `tol` of a single plane (or a line).
/// Used to reject neighbor sets that cannot span a 3D hull.
pub fn is_coplanar(points: &[Point3], tol: f64) -> bool {
    if points.len() < 4 {
        return true;
    }
    let origin = points[0];

    // Find the first pair spanning a non-degenerate plane with the origin
    let mut normal = None;
    'outer: for i in 1..points.len() {
        for j in (i + 1)..points.len() {
            let n = cross(sub(points[i], origin), sub(points[j], origin));
            let n_len = len(n);
            if n_len > tol {
                normal = Some(scale(n, 1.0 / n_len));
                break 'outer;
            }
        }
    }

    match normal {
        // All collinear
        None => true,
        Some(n) => points.iter().all(|p| dot(sub(*p, origin), n).abs() <= tol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_lerp() {
        let a = [0.0, 0.0, 0.0];
        let b = [3.0, 4.0, 0.0];
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        let mid = lerp(a, b, 0.5);
        assert!((mid[0] - 1.5).abs() < 1e-12);
        assert!((mid[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_coplanar_square() {
        let square = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        assert!(is_coplanar(&square, 1e-8));
    }

    #[test]
    fn test_tetrahedron_not_coplanar() {
        let tetra = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        assert!(!is_coplanar(&tetra, 1e-8));
    }
}
