// =====================================================
// Luhn 체크섬
// =====================================================
// 역할: 주문 번호 / 차감 번호의 형식 검증
//
// 알고리즘:
// 1. 오른쪽 끝 자리부터 시작
// 2. 두 번째 자리마다 2배 (9보다 크면 9를 뺌)
// 3. 전체 합이 10으로 나누어 떨어지면 유효
// =====================================================

/// Luhn 알고리즘으로 번호 검증
/// Validate a number string with the Luhn checksum
///
/// 숫자 이외의 문자가 섞여 있거나 빈 문자열이면 false
pub fn is_valid_luhn(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(index, byte)| {
            let digit = u32::from(byte - b'0');
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}
