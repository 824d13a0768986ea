// 포인트 적립 서버 라이브러리
// Loyalty points server library
//
// 구조:
// - domains: 도메인별 모델/서비스/핸들러 (auth, loyalty)
// - shared: 공통 인프라 (DB, HTTP 클라이언트, 설정, 에러, 미들웨어)
// - routes: 전체 라우터 조합
pub mod domains;
pub mod routes;
pub mod shared;
