pub mod mock_price;
