use rand::Rng;

/// Index of a weighted pick. Non-positive and non-finite weights count as
/// zero; with no mass at all the pick is uniform.
pub fn choose_weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let total: f64 = weights.iter().map(|w| clean(*w)).sum();
    if !(total > 0.0) || !total.is_finite() {
        return Some(rng.gen_range(0..weights.len()));
    }
    let mut roll = rng.gen_range(0.0..total);
    let mut last = None;
    for (i, w) in weights.iter().enumerate() {
        let w = clean(*w);
        if w <= 0.0 {
            continue;
        }
        if roll < w {
            return Some(i);
        }
        roll -= w;
        last = Some(i);
    }
    // rounding can leave a sliver of roll past the last bucket
    last
}

/// Picks an item with probability proportional to `weight`.
pub fn choose_weighted<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    items: &'a [T],
    weight: impl Fn(&T) -> f64,
) -> Option<&'a T> {
    let weights: Vec<f64> = items.iter().map(weight).collect();
    choose_weighted_index(rng, &weights).map(|i| &items[i])
}

/// Weighted draw without replacement: the whole list in draw order.
pub fn weighted_order<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    items: &[T],
    weight: impl Fn(&T) -> f64,
) -> Vec<T> {
    let mut pool: Vec<(T, f64)> = items.iter().map(|t| (t.clone(), weight(t))).collect();
    let mut out = Vec::with_capacity(pool.len());
    while !pool.is_empty() {
        let weights: Vec<f64> = pool.iter().map(|p| p.1).collect();
        match choose_weighted_index(rng, &weights) {
            Some(i) => out.push(pool.remove(i).0),
            None => break,
        }
    }
    out
}
