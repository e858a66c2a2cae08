pub mod meal_list;
