/// Exclusive prefix sum of `counts`, with the total appended as the last entry.
///
/// The result has `counts.len() + 1` entries and is suitable as CSR-style offsets.
pub fn prefix_sum(counts: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut offsets = vec![0];
    let mut total = 0;
    for count in counts {
        total += count;
        offsets.push(total);
    }
    offsets
}
