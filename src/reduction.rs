// 🔢 Digit Reduction
// Repeated digit summing down to a single digit (the root of every derived number)

/// Sum of the base-10 digits of `n`
pub fn digit_sum(mut n: u64) -> u64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Reduce `n` to a single digit by summing its digits until the value is <= 9.
///
/// 0 stays 0; every positive input lands in 1..=9.
pub fn reduce_to_digit(mut n: u64) -> u8 {
    while n > 9 {
        n = digit_sum(n);
    }
    n as u8
}
