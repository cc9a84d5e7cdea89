pub mod cancel_order;
pub mod delete_order;
pub mod delete_orders;
pub mod get_order_details;
pub mod get_order_status;
pub mod list_orders;
pub mod mark_order_delivered;
pub mod mark_order_paid;
pub mod update_order_email;

pub use cancel_order::{CancelOrderCommand, CancelOrderResponse, CancelOrderUseCase};
pub use delete_order::{DeleteOrderCommand, DeleteOrderUseCase};
pub use delete_orders::{DeleteOrdersCommand, DeleteOrdersResponse, DeleteOrdersUseCase};
pub use get_order_details::{
  CardDto, GetOrderDetailsCommand, GetOrderDetailsUseCase, OrderDetailsResponse,
  RefundRequestDto,
};
pub use get_order_status::{GetOrderStatusCommand, GetOrderStatusUseCase, OrderStatusResponse};
pub use list_orders::{ListOrdersCommand, ListOrdersResponse, ListOrdersUseCase, OrderListItemDto};
pub use mark_order_delivered::{MarkOrderDeliveredCommand, MarkOrderDeliveredUseCase};
pub use mark_order_paid::{MarkOrderPaidCommand, MarkOrderPaidUseCase, OrderStatusChangedResponse};
pub use update_order_email::{
  UpdateOrderEmailCommand, UpdateOrderEmailResponse, UpdateOrderEmailUseCase,
};
