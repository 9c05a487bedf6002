//! Title rating aggregation.
//!
//! A title's rating is the arithmetic mean of its review scores rounded to
//! one decimal place, or `None` when the title has no reviews. The rating is
//! a read-time projection over the current review rows and is never stored
//! on the title, so review writes need no invalidation step.

/// Round a mean score to one decimal place.
///
/// Rounding is decided on the exact binary value of `mean`: a true tie
/// (7.25) goes to the even tenth (7.2), while a value whose binary form sits
/// just above or below a decimal tie (6.65 is stored as 6.65000000000000035..)
/// rounds toward the side it actually lies on.
pub fn round_to_tenth(mean: f64) -> f64 {
    let scaled = mean * 10.0;
    // Exact error of the multiplication above.
    let residue = mean.mul_add(10.0, -scaled);
    let floor = scaled.floor();

    let rounded = if scaled - floor != 0.5 {
        scaled.round()
    } else if residue > 0.0 {
        floor + 1.0
    } else if residue < 0.0 {
        floor
    } else {
        scaled.round_ties_even()
    };

    rounded / 10.0
}

/// Finalize a storage-computed average (`AVG(score)`, `NULL` when there are
/// no rows) into a display rating.
pub fn round_rating(avg: Option<f64>) -> Option<f64> {
    avg.map(round_to_tenth)
}

/// Compute a rating directly from a set of scores.
pub fn aggregate<I>(scores: I) -> Option<f64>
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0i64, 0u32), |(sum, count), score| (sum + score.into(), count + 1));

    if count == 0 {
        None
    } else {
        Some(round_to_tenth(sum as f64 / f64::from(count)))
    }
}
