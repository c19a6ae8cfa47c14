use super::*;

#[test]
fn similarity_of_zero_distance_is_one() {
    assert!((similarity_from_distance(0.0) - 1.0).abs() < f32::EPSILON);
}

#[test]
fn similarity_of_orthogonal_vectors_is_zero() {
    assert!(similarity_from_distance(1.0).abs() < f32::EPSILON);
}

#[test]
fn similarity_of_opposite_vectors_is_negative_one() {
    assert!((similarity_from_distance(2.0) + 1.0).abs() < f32::EPSILON);
}

#[test]
fn similarity_stays_in_bounds_for_cosine_distances() {
    for step in 0..=20 {
        let distance = step as f32 * 0.1;
        let similarity = similarity_from_distance(distance);
        assert!((-1.0..=1.0).contains(&similarity), "distance {}", distance);
    }
}

#[test]
fn similarity_decreases_with_distance() {
    assert!(similarity_from_distance(0.1) > similarity_from_distance(0.2));
    assert!(similarity_from_distance(1.5) > similarity_from_distance(1.9));
}
