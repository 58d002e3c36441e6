/// For each element of `seq1`, in order, the index of its first occurrence in
/// `seq2`. Elements absent from `seq2` are skipped, so the result can be
/// shorter than `seq1`; callers expecting a 1:1 correspondence must compare
/// lengths themselves.
pub fn match_indices<T: PartialEq>(seq1: &[T], seq2: &[T]) -> Vec<usize> {
    seq1.iter()
        .filter_map(|wanted| seq2.iter().position(|candidate| candidate == wanted))
        .collect()
}
