use chaostego_core::BitIterator;

#[test]
fn should_return_the_8_bits_of_h_most_significant_first() {
    let b = [0b0100_1000, 0b0110_0001, 0b0110_1100];
    let bits: Vec<bool> = BitIterator::new(&b[..]).take(8).collect();

    assert_eq!(
        bits,
        vec![false, true, false, false, true, false, false, false]
    );
}

#[test]
fn should_return_8_bits_of_a_after_skip_8() {
    let b = [0b0100_1000, 0b0110_0001];
    let mut it = BitIterator::new(&b[..]).skip(8);

    assert_eq!(it.next(), Some(false), "1st bit not correct");
    assert_eq!(it.next(), Some(true), "2nd bit not correct");
    assert_eq!(it.next(), Some(true), "3rd bit not correct");
    assert_eq!(it.next(), Some(false), "4th bit not correct");
    assert_eq!(it.next(), Some(false), "5th bit not correct");
    assert_eq!(it.next(), Some(false), "6th bit not correct");
    assert_eq!(it.next(), Some(false), "7th bit not correct");
    assert_eq!(it.next(), Some(true), "8th bit not correct");
    assert_eq!(
        it.next(),
        None,
        "it should end after the last bit on the last byte"
    );
}

#[test]
fn should_yield_nothing_for_no_bytes() {
    assert_eq!(BitIterator::new(&[][..]).count(), 0);
}
